pub mod auth_service;
pub mod content_service;
pub mod hh_client;
pub mod vacancy_service;

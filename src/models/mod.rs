pub mod post;
pub mod user;
pub mod vacancy;

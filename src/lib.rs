pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::Result;
use crate::middleware::rate_limit::{rps_middleware, RateLimiter};
use crate::services::{
    auth_service::AuthService,
    content_service::ContentService,
    hh_client::HhClient,
    vacancy_service::{VacancyService, VacancyServiceOptions},
};
use crate::utils::time::{Clock, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub vacancy_service: VacancyService,
    pub content_service: ContentService,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Result<Self> {
        Self::with_clock(pool, config, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: PgPool, config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let hh_client = HhClient::new(
            &config.hh_api_base_url,
            &config.hh_user_agent,
            Duration::from_secs(config.hh_request_timeout_secs),
        )?;
        let vacancy_service = VacancyService::new(
            hh_client,
            clock,
            VacancyServiceOptions {
                detail_concurrency: config.vacancy_detail_concurrency,
                fetch_timeout: Duration::from_secs(config.vacancy_fetch_timeout_secs),
                failure_policy: config.vacancy_failure_policy,
            },
        );
        let content_service = ContentService::new(pool.clone());
        let auth_service = AuthService::new(
            pool.clone(),
            config.jwt_secret.clone(),
            config.session_ttl_hours,
        );

        Ok(Self {
            pool,
            vacancy_service,
            content_service,
            auth_service,
        })
    }
}

/// All routes, with the public rate limit applied.
pub fn build_router(state: AppState, public_rps: u32) -> Router {
    let pages = Router::new()
        .route("/", get(routes::content::home))
        .route("/geography", get(routes::content::geography))
        .route("/demand", get(routes::content::demand))
        .route("/skills", get(routes::content::skills))
        .route("/recent-vacancies", get(routes::vacancy::recent_vacancies))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(public_rps),
            rps_middleware,
        ));

    Router::new()
        .route("/health", get(routes::health::health))
        .merge(pages)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

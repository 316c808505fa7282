use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Request to {url} failed: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned status {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Malformed response from {url}: {source}")]
    MalformedPayload {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Vacancy {id} has a missing or invalid `{field}`")]
    MalformedRecord { id: String, field: &'static str },

    #[error("Vacancy fetch did not finish within {0:?}")]
    FetchTimedOut(std::time::Duration),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Upstream failures while talking to the vacancy API.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::FetchFailed { .. }
                | Error::UpstreamStatus { .. }
                | Error::MalformedPayload { .. }
                | Error::MalformedRecord { .. }
                | Error::FetchTimedOut(_)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        if self.is_upstream() {
            tracing::error!(error = %self, "Vacancy aggregation failed");
        }

        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            err @ (Error::FetchFailed { .. }
            | Error::UpstreamStatus { .. }
            | Error::MalformedPayload { .. }
            | Error::MalformedRecord { .. }) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", err),
            ),
            err @ Error::FetchTimedOut(_) => (StatusCode::GATEWAY_TIMEOUT, err.to_string()),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error::Internal(format!("Session token error: {}", err))
    }
}

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    dto::auth_dto::{LoginPayload, RegisterPayload},
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/register",
    responses(
        (status = 201, description = "User created and signed in"),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Username already taken")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = state.auth_service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    post,
    path = "/login",
    responses(
        (status = 200, description = "Signed in"),
        (status = 401, description = "Invalid username or password")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = state.auth_service.login(payload).await?;
    Ok(Json(session))
}

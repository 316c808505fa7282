use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{error::Result, AppState};

pub const HOME_TITLE: &str = "Главная";
pub const GEOGRAPHY_TITLE: &str = "География";
pub const DEMAND_TITLE: &str = "Востребованность";
pub const SKILLS_TITLE: &str = "Навыки";

async fn render_page(state: &AppState, title: &str) -> Result<Json<serde_json::Value>> {
    let content = state.content_service.page(title).await?;
    Ok(Json(json!({
        "title": title,
        "content": content,
    })))
}

#[utoipa::path(get, path = "/", responses((status = 200, description = "Home page")))]
#[axum::debug_handler]
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse> {
    render_page(&state, HOME_TITLE).await
}

#[utoipa::path(get, path = "/geography", responses((status = 200, description = "Geography page")))]
#[axum::debug_handler]
pub async fn geography(State(state): State<AppState>) -> Result<impl IntoResponse> {
    render_page(&state, GEOGRAPHY_TITLE).await
}

#[utoipa::path(get, path = "/demand", responses((status = 200, description = "Demand page")))]
#[axum::debug_handler]
pub async fn demand(State(state): State<AppState>) -> Result<impl IntoResponse> {
    render_page(&state, DEMAND_TITLE).await
}

#[utoipa::path(get, path = "/skills", responses((status = 200, description = "Skills page")))]
#[axum::debug_handler]
pub async fn skills(State(state): State<AppState>) -> Result<impl IntoResponse> {
    render_page(&state, SKILLS_TITLE).await
}

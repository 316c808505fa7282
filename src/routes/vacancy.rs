use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{dto::vacancy_dto::RecentVacanciesResponse, error::Result, AppState};

#[utoipa::path(
    get,
    path = "/recent-vacancies",
    responses(
        (status = 200, description = "Yesterday's QA vacancies from hh.ru"),
        (status = 502, description = "hh.ru failed or returned a malformed vacancy"),
        (status = 504, description = "hh.ru did not answer in time")
    )
)]
#[axum::debug_handler]
pub async fn recent_vacancies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let vacancies = state.vacancy_service.fetch_recent_vacancies().await?;
    Ok(Json(RecentVacanciesResponse { vacancies }))
}

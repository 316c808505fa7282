//! Wire types for the hh.ru vacancy API and the recent-vacancies response.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::vacancy::VacancyRecord;

/// `GET /vacancies` response. Only the ids of the summaries are used.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<VacancySummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VacancySummary {
    pub id: String,
}

/// `GET /vacancies/{id}` response. Every field is optional here so that a
/// missing one can be reported by name instead of as a generic decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VacancyDetail {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    #[serde(default)]
    pub salary: Option<Salary>,
    #[serde(default)]
    pub key_skills: Option<Vec<KeySkill>>,
    pub employer: Option<NamedRef>,
    pub area: Option<NamedRef>,
    pub alternate_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Salary {
    pub from: Option<Decimal>,
    pub to: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeySkill {
    pub name: String,
}

/// Nested `{ "name": ... }` objects such as `employer` and `area`.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentVacanciesResponse {
    pub vacancies: Vec<VacancyRecord>,
}

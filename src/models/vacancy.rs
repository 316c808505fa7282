use serde::{Deserialize, Serialize};

/// A flattened hh.ru vacancy ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyRecord {
    pub name: String,
    pub key_skills: String,
    pub employer_name: String,
    pub area: String,
    pub link: String,
    pub date: String,
    pub description: String,
    pub salary: String,
}

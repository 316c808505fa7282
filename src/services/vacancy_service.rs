use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use tracing::{info, instrument, warn};

use crate::config::FailurePolicy;
use crate::dto::vacancy_dto::{Salary, VacancyDetail, VacancySummary};
use crate::error::{Error, Result};
use crate::models::vacancy::VacancyRecord;
use crate::services::hh_client::HhClient;
use crate::utils::html::strip_html;
use crate::utils::time::{cutoff_date, format_published_at, Clock};

#[derive(Debug, Clone)]
pub struct VacancyServiceOptions {
    pub detail_concurrency: usize,
    pub fetch_timeout: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for VacancyServiceOptions {
    fn default() -> Self {
        Self {
            detail_concurrency: 4,
            fetch_timeout: Duration::from_secs(30),
            failure_policy: FailurePolicy::Abort,
        }
    }
}

/// Builds the "yesterday's QA vacancies" list from hh.ru.
#[derive(Clone)]
pub struct VacancyService {
    client: HhClient,
    clock: Arc<dyn Clock>,
    options: VacancyServiceOptions,
}

impl VacancyService {
    pub const MAX_VACANCIES: usize = 10;

    pub fn new(client: HhClient, clock: Arc<dyn Clock>, options: VacancyServiceOptions) -> Self {
        Self {
            client,
            clock,
            options,
        }
    }

    /// Searches postings up to yesterday and returns the first ten, normalized,
    /// in the order the API listed them.
    #[instrument(skip(self), fields(base_url = %self.client.base_url()))]
    pub async fn fetch_recent_vacancies(&self) -> Result<Vec<VacancyRecord>> {
        let timeout = self.options.fetch_timeout;
        tokio::time::timeout(timeout, self.collect_recent())
            .await
            .map_err(|_| Error::FetchTimedOut(timeout))?
    }

    async fn collect_recent(&self) -> Result<Vec<VacancyRecord>> {
        let date_to = cutoff_date(self.clock.today());
        let mut summaries = self.client.search(&date_to).await?.items;
        summaries.truncate(Self::MAX_VACANCIES);
        info!(%date_to, count = summaries.len(), "Fetching vacancy details");

        let details = stream::iter(summaries)
            .map(|summary| self.fetch_record(summary))
            .buffered(self.options.detail_concurrency.max(1));

        let records: Vec<VacancyRecord> = match self.options.failure_policy {
            FailurePolicy::Abort => details.try_collect().await?,
            FailurePolicy::Skip => {
                details
                    .filter_map(|result| async move {
                        match result {
                            Ok(record) => Some(record),
                            Err(err) => {
                                warn!(error = %err, "Skipping vacancy that failed to load");
                                None
                            }
                        }
                    })
                    .collect()
                    .await
            }
        };

        info!(count = records.len(), "Recent vacancies ready");
        Ok(records)
    }

    async fn fetch_record(&self, summary: VacancySummary) -> Result<VacancyRecord> {
        let detail = self.client.vacancy(&summary.id).await?;
        normalize(&summary.id, detail)
    }
}

/// Flattens one detail payload. `id` is the summary id, used in error reports.
pub fn normalize(id: &str, detail: VacancyDetail) -> Result<VacancyRecord> {
    let missing = |field: &'static str| Error::MalformedRecord {
        id: id.to_string(),
        field,
    };

    let published_at = detail.published_at.ok_or_else(|| missing("published_at"))?;
    let date = format_published_at(&published_at).ok_or_else(|| missing("published_at"))?;
    let description = detail.description.ok_or_else(|| missing("description"))?;

    Ok(VacancyRecord {
        name: detail.name.ok_or_else(|| missing("name"))?,
        key_skills: detail
            .key_skills
            .unwrap_or_default()
            .into_iter()
            .map(|skill| skill.name)
            .collect::<Vec<_>>()
            .join(", "),
        employer_name: detail
            .employer
            .and_then(|employer| employer.name)
            .ok_or_else(|| missing("employer.name"))?,
        area: detail
            .area
            .and_then(|area| area.name)
            .ok_or_else(|| missing("area.name"))?,
        link: detail.alternate_url.ok_or_else(|| missing("alternate_url"))?,
        date,
        description: strip_html(&description),
        salary: format_salary(id, detail.salary.as_ref())?,
    })
}

/// `"<amount> <currency>"`, preferring the upper bound. Empty when there is no salary
/// or the salary object carries neither bound.
pub fn format_salary(id: &str, salary: Option<&Salary>) -> Result<String> {
    let Some(salary) = salary else {
        return Ok(String::new());
    };
    let Some(amount) = salary.to.or(salary.from) else {
        return Ok(String::new());
    };
    let currency = salary
        .currency
        .as_deref()
        .ok_or_else(|| Error::MalformedRecord {
            id: id.to_string(),
            field: "salary.currency",
        })?;
    Ok(format!("{} {}", amount.normalize(), currency))
}

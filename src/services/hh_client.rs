use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::dto::vacancy_dto::{SearchResponse, VacancyDetail};
use crate::error::{Error, Result};

/// Thin client over the two hh.ru endpoints the aggregator needs.
#[derive(Clone)]
pub struct HhClient {
    client: Client,
    base_url: String,
}

impl HhClient {
    pub const SEARCH_TEXT: &'static str = "qa";
    pub const ORDER_BY: &'static str = "publication_time";
    pub const SEARCH_FIELD: &'static str = "name";
    pub const DATE_FROM: &'static str = "2023-01-01";

    pub fn new(base_url: &str, user_agent: &str, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(request_timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build hh.ru HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search URL for postings titled "qa" published up to `date_to`.
    pub fn search_url(&self, date_to: &str) -> Result<Url> {
        let mut url = self.endpoint("/vacancies")?;
        url.query_pairs_mut()
            .append_pair("text", Self::SEARCH_TEXT)
            .append_pair("order_by", Self::ORDER_BY)
            .append_pair("search_field", Self::SEARCH_FIELD)
            .append_pair("date_from", Self::DATE_FROM)
            .append_pair("date_to", date_to);
        Ok(url)
    }

    pub fn vacancy_url(&self, id: &str) -> Result<Url> {
        let mut url = self.endpoint("/vacancies")?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("hh.ru base URL cannot be a base: {}", self.base_url)))?
            .push(id);
        Ok(url)
    }

    pub async fn search(&self, date_to: &str) -> Result<SearchResponse> {
        let url = self.search_url(date_to)?;
        tracing::debug!(%url, "Searching hh.ru vacancies");
        self.get_json(url).await
    }

    pub async fn vacancy(&self, id: &str) -> Result<VacancyDetail> {
        let url = self.vacancy_url(id)?;
        tracing::debug!(%url, "Fetching hh.ru vacancy details");
        self.get_json(url).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| Error::Config(format!("Invalid hh.ru base URL {}: {}", self.base_url, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let url_str = url.to_string();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| Error::FetchFailed {
                url: url_str.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url_str, status = status.as_u16(), "hh.ru returned an error status");
            return Err(Error::UpstreamStatus {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| Error::FetchFailed {
            url: url_str.clone(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| Error::MalformedPayload {
            url: url_str,
            source,
        })
    }
}

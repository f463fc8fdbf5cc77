//! HTTP client for the PNCP public consultation API.

mod fetch_all;

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::PncpError;
use crate::retry::{retry_with_backoff, Sleeper, TokioSleeper};
use crate::types::{Page, PageEnvelope};

/// Contracts listing, relative to the consultation base URL.
pub const CONTRACTS_ENDPOINT: &str = "/v1/contratos";

/// Fixed page size requested from every listing.
pub const PAGE_SIZE: u32 = 500;

/// Maximum number of pages to fetch before giving up.
/// Guards against servers that misreport `totalPaginas`.
pub const MAX_PAGES: u32 = 2_000;

/// Client for the PNCP listing endpoints.
///
/// Each page request is retried on transient errors (transport failures and
/// 5xx) up to `max_attempts` total attempts; 4xx responses fail immediately.
/// Use [`PncpClient::with_sleeper`] to swap the back-off clock in tests.
pub struct PncpClient<S = TokioSleeper> {
    client: Client,
    base_url: String,
    max_attempts: u32,
    backoff_step_secs: u64,
    sleeper: S,
}

impl PncpClient<TokioSleeper> {
    /// Creates a client with configured base URL, timeout, `User-Agent`, and
    /// retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`PncpError::InvalidBaseUrl`] if `base_url` does not parse, or
    /// [`PncpError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_attempts: u32,
        backoff_step_secs: u64,
    ) -> Result<Self, PncpError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|e| PncpError::InvalidBaseUrl {
            base_url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            max_attempts: max_attempts.max(1),
            backoff_step_secs,
            sleeper: TokioSleeper,
        })
    }
}

impl<S: Sleeper> PncpClient<S> {
    /// Replaces the back-off sleeper, keeping every other setting.
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> PncpClient<T> {
        PncpClient {
            client: self.client,
            base_url: self.base_url,
            max_attempts: self.max_attempts,
            backoff_step_secs: self.backoff_step_secs,
            sleeper,
        }
    }

    /// Fetches one page of `endpoint`, retrying transient errors.
    ///
    /// A `204 No Content` answer is an empty page.
    ///
    /// # Errors
    ///
    /// - [`PncpError::ServerError`] / [`PncpError::Http`] after all attempts failed.
    /// - [`PncpError::ClientError`] on any 4xx (not retried).
    /// - [`PncpError::UnexpectedStatus`] on other non-2xx statuses (not retried).
    /// - [`PncpError::Deserialize`] when the body is not a listing envelope.
    pub async fn fetch_page(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        page: u32,
    ) -> Result<Page, PncpError> {
        let url = self.page_url(endpoint, params, page)?;
        retry_with_backoff(self.max_attempts, self.backoff_step_secs, &self.sleeper, || {
            self.request_page(&url)
        })
        .await
    }

    /// Single attempt at one page.
    async fn request_page(&self, url: &Url) -> Result<Page, PncpError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(Page::empty());
        }
        if status.is_server_error() {
            return Err(PncpError::ServerError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        if status.is_client_error() {
            return Err(PncpError::ClientError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(PncpError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let envelope = serde_json::from_str::<PageEnvelope>(&body).map_err(|e| {
            PncpError::Deserialize {
                context: url.to_string(),
                source: e,
            }
        })?;
        Ok(envelope.into())
    }

    /// Builds the page URL: base + endpoint, the caller's parameters, then
    /// `pagina` and `tamanhoPagina`.
    fn page_url(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        page: u32,
    ) -> Result<Url, PncpError> {
        let raw = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| PncpError::InvalidBaseUrl {
            base_url: raw.clone(),
            reason: e.to_string(),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("pagina", &page.to_string());
            pairs.append_pair("tamanhoPagina", &PAGE_SIZE.to_string());
        }
        Ok(url)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;

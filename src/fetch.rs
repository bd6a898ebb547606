//! Document fetching.
//!
//! The core only sees the [`DocumentFetcher`] trait. [`HttpFetcher`] is the
//! blocking HTTP implementation used by the CLI; tests plug in canned pages.
//! Failures are never retried here and surface as
//! [`StatsError::UpstreamUnavailable`].

use crate::error::{Result, StatsError};
use std::time::Duration;

/// Default site serving player pages and search.
pub const DEFAULT_BASE_URL: &str = "https://www.basketball-reference.com";

/// Something that can turn a URL into a document.
pub trait DocumentFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Configuration for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Site root used for search and relative links
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            user_agent: concat!("nba-stats-toolkit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Search URL for a (partial) player name. The query is form-encoded.
    pub fn search_url(&self, query: &str) -> Result<String> {
        let endpoint = format!("{}/search/search.fcgi", self.base_url.trim_end_matches('/'));
        let url = reqwest::Url::parse_with_params(&endpoint, &[("search", query.trim())])
            .map_err(|e| StatsError::InvalidUrl {
                url: endpoint.clone(),
                reason: e.to_string(),
            })?;
        Ok(url.into())
    }
}

/// Blocking HTTP fetcher.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| upstream(&config.base_url, e))?;
        Ok(Self { client })
    }
}

impl DocumentFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        log::info!("Fetching {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| upstream(url, e))?;
        let body = resp.text().map_err(|e| upstream(url, e))?;
        log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

fn upstream(url: &str, err: reqwest::Error) -> StatsError {
    StatsError::UpstreamUnavailable {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

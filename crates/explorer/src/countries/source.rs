use crate::prelude::*;
use async_trait::async_trait;
use explorer_core::country::{DetailCountry, SummaryResponse};

pub const DEFAULT_SUMMARY_URL: &str = "https://api.first.org/data/v1/countries";
pub const DEFAULT_DETAIL_URL: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_FLAG_URL: &str = "https://flagsapi.com";

/// Upstream endpoints, overridable through environment variables
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub summary_url: String,
    pub detail_url: String,
    pub flag_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            summary_url: DEFAULT_SUMMARY_URL.to_string(),
            detail_url: DEFAULT_DETAIL_URL.to_string(),
            flag_url: DEFAULT_FLAG_URL.to_string(),
        }
    }
}

impl SourceConfig {
    /// Load configuration from environment variables, falling back to the public endpoints
    pub fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            summary_url: var("EXPLORER_SUMMARY_URL", DEFAULT_SUMMARY_URL),
            detail_url: var("EXPLORER_DETAIL_URL", DEFAULT_DETAIL_URL),
            flag_url: var("EXPLORER_FLAG_URL", DEFAULT_FLAG_URL),
        }
    }

    /// Host of the summary endpoint, reported in stats
    pub fn api_source(&self) -> String {
        reqwest::Url::parse(&self.summary_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| self.summary_url.clone())
    }
}

/// Where country payloads come from
///
/// Implementations only move bytes and decode them; every policy decision
/// (fallbacks, caching, merging) belongs to the service.
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Fetch one page of the summary listing
    ///
    /// `offset` is omitted from the request when `None`.
    async fn fetch_summary(&self, offset: Option<usize>, limit: usize) -> Result<SummaryResponse>;

    /// Fetch the detail payload for one country code
    async fn fetch_detail(&self, code: &str) -> Result<Vec<DetailCountry>>;
}

/// `CountrySource` backed by the public REST endpoints
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    config: SourceConfig,
}

impl HttpSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("world-explorer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

#[async_trait]
impl CountrySource for HttpSource {
    async fn fetch_summary(&self, offset: Option<usize>, limit: usize) -> Result<SummaryResponse> {
        let mut query_params: Vec<(&str, String)> = Vec::new();
        if let Some(offset) = offset {
            query_params.push(("offset", offset.to_string()));
        }
        query_params.push(("limit", limit.to_string()));

        let response = self
            .client
            .get(&self.config.summary_url)
            .query(&query_params)
            .send()
            .await
            .map_err(|e| eyre!("Failed to fetch country summary: {}", e))?;

        if !response.status().is_success() {
            return Err(eyre!("API error: HTTP {}", response.status()));
        }

        response
            .json::<SummaryResponse>()
            .await
            .map_err(|e| eyre!("Failed to parse country summary: {}", e))
    }

    async fn fetch_detail(&self, code: &str) -> Result<Vec<DetailCountry>> {
        let base_url = self.config.detail_url.trim_end_matches('/');
        let url = format!("{}/alpha/{}", base_url, urlencoding::encode(code));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| eyre!("Failed to fetch details for {}: {}", code, e))?;

        if !response.status().is_success() {
            return Err(eyre!(
                "Failed to fetch details for {}: HTTP {}",
                code,
                response.status()
            ));
        }

        response
            .json::<Vec<DetailCountry>>()
            .await
            .map_err(|e| eyre!("Failed to parse details for {}: {}", code, e))
    }
}

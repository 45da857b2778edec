use std::env;
use std::time::Duration;

pub const BASE_URL_ENV: &str = "SOLR_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8983/solr";

lazy_static::lazy_static! {
    static ref ENV_BASE_URL: String =
        env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
}

/// Where and how to reach Solr
#[derive(Debug, Clone, PartialEq)]
pub struct SolrConfig {
    /// Service root, e.g. `http://localhost:8983/solr`
    pub base_url: String,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl SolrConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }

    /// Base URL from `SOLR_BASE_URL`, read once per process
    pub fn from_env() -> Self {
        Self::new(ENV_BASE_URL.as_str())
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

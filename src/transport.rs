//! The single HTTP call every client operation goes through.
//!
//! A request either yields the decoded JSON body or fails as a whole; there is
//! no retry and no partial result.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

use crate::config::SolrConfig;
use crate::error::{Result, SolrError};
use crate::params::Params;

/// Per-call overrides passed through to the HTTP layer
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A fully formed request
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub url: String,
    pub method: Method,
    /// Query-string pairs; repeated keys are sent as-is
    pub params: Params,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            params: Params::new(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: String) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            url: url.into(),
            method: Method::POST,
            params: Params::new(),
            headers,
            body: Some(body),
            timeout: None,
        }
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Apply caller options. Headers set by the operation itself win.
    pub fn with_options(mut self, options: &RequestOptions) -> Self {
        let mut headers = options.headers.clone();
        headers.extend(self.headers);
        self.headers = headers;
        if options.timeout.is_some() {
            self.timeout = options.timeout;
        }
        self
    }
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &SolrConfig) -> Result<Self> {
        // One connection per request; nothing is kept open between calls
        let mut builder = Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Send `config` and decode the JSON body into `T`
    pub async fn request<T: DeserializeOwned>(&self, config: RequestConfig) -> Result<T> {
        tracing::debug!(
            method = %config.method,
            url = %config.url,
            params = config.params.len(),
            "Sending Solr request"
        );

        let mut request = self
            .client
            .request(config.method, &config.url)
            .headers(config.headers);
        if !config.params.is_empty() {
            request = request.query(&config.params);
        }
        if let Some(body) = config.body {
            request = request.body(body);
        }
        if let Some(timeout) = config.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %config.url, "Solr request failed");
            return Err(SolrError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

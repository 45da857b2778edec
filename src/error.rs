use thiserror::Error;

/// Errors surfaced by the Solr client
#[derive(Debug, Error)]
pub enum SolrError {
    /// Network failure, timeout or an unbuildable request
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Solr answered with a non-2xx status
    #[error("Solr returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Malformed response body or unserializable request body
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A native parameter that has no flat query-string form
    #[error("Invalid query parameter '{key}': {reason}")]
    InvalidParams { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, SolrError>;

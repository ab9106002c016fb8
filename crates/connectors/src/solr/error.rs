use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolrError {
    /// The configured core URL could not be turned into a select endpoint.
    #[error("Invalid Solr URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport-level failure: connect, TLS, or reading the body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Solr answered with a non-success status.
    #[error("Solr returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not a JSON select response with `id`/`fullrecord` docs.
    #[error("Failed to decode Solr response: {0}")]
    Decode(#[from] serde_json::Error),
}

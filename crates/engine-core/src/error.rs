use connectors::{file::mrc::error::FileError, solr::error::SolrError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Solr error: {0}")]
    Solr(#[from] SolrError),

    /// Failure reported by a source that is not backed by Solr.
    #[error("Source error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("Console write error: {0}")]
    Console(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PacingError {
    #[error("Invalid pause of {0} seconds between pages")]
    InvalidPause(f64),
}

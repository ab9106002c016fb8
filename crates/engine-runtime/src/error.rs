use engine_core::error::{PacingError, SinkError, SourceError};
use thiserror::Error;

/// Top-level errors for an export run. None of them is retried.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Connecting to or querying the record source failed.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Writing, flushing or closing the output failed.
    #[error("Output error: {0}")]
    Sink(#[from] SinkError),

    /// The configured delay produced an unusable pause.
    #[error("Pacing error: {0}")]
    Pacing(#[from] PacingError),
}

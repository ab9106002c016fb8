use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("Failed to create output file {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Output file set is already closed")]
    Closed,
}

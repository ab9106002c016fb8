use engine_runtime::error::ExportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

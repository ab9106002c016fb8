use crate::{commands::ExportArgs, error::CliError, exit::ExitCode};
use clap::Parser;
use engine_runtime::execution::{executor, settings::ExportSettings};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit;

#[derive(Parser, Debug)]
#[command(
    name = "marcdump",
    version,
    about = "Dump binary MARC 21 records from a VuFind Solr index",
    allow_negative_numbers = true
)]
struct Cli {
    #[command(flatten)]
    export: ExportArgs,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout may be carrying the record stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_from(commands::normalize_legacy_flags(std::env::args_os()));

    let code = match export(cli).await {
        Ok(_) => ExitCode::Success,
        Err(err) => {
            error!("{err}");
            ExitCode::GeneralError
        }
    };

    std::process::exit(code.as_i32());
}

async fn export(cli: Cli) -> Result<u64, CliError> {
    let settings = ExportSettings::from(cli.export);
    Ok(executor::run(settings).await?)
}

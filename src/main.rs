//! BEAM site entrypoint: serve the API or print a listing.

use std::io::{self, Write};
use std::process::ExitCode;

use beam_site::{BeamConfig, OperationMode, SiteError, init_tracing};
use ortho_config::OrthoConfig;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), SiteError> {
    let config = load_config()?;
    init_tracing(config.resolve_log_format()?).map_err(|error| SiteError::Configuration {
        message: format!("failed to install log subscriber: {error}"),
    })?;

    match config.operation_mode() {
        OperationMode::Serve => cli::serve::run(&config).await,
        OperationMode::List => cli::listing::run(&config).await,
        OperationMode::Watch => cli::watch::run(&config).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`SiteError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<BeamConfig, SiteError> {
    BeamConfig::load().map_err(|error| SiteError::Configuration {
        message: error.to_string(),
    })
}

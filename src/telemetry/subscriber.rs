//! Diagnostic log output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt as log_fmt};

const DEFAULT_FILTER: &str = "beam_site=info,tower_http=info,warn";

/// How log lines are written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Error returned when a log format name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log format '{name}' (expected pretty or json)")]
pub struct UnknownLogFormat {
    /// Name that failed to parse.
    pub name: String,
}

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(UnknownLogFormat {
                name: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        })
    }
}

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` when set and otherwise logs this crate
/// and the HTTP trace layer at `info`. Output always goes to stderr so that
/// listing pages printed to stdout stay clean.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = matches!(format, LogFormat::Json).then(|| {
        log_fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let pretty = matches!(format, LogFormat::Pretty).then(|| {
        log_fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .try_init()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::LogFormat;

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case("JSON", LogFormat::Json)]
    #[case("pretty", LogFormat::Pretty)]
    #[case(" text ", LogFormat::Pretty)]
    fn parses_log_formats(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(raw.parse::<LogFormat>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_formats() {
        let error = "xml".parse::<LogFormat>().expect_err("xml is not a format");

        assert_eq!(error.name, "xml");
    }
}

//! Application configuration loaded from CLI, environment, and files.
//!
//! # Precedence
//!
//! Values are merged from lowest to highest precedence:
//!
//! 1. **Defaults**: built-in application defaults
//! 2. **Configuration file**: `.beam.toml` in the current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables**: `BEAM_*`, plus the legacy `SUPABASE_URL`,
//!    `SUPABASE_ANON_KEY` and `STRIPE_SECRET_KEY`
//! 4. **Command-line arguments**
//!
//! # Configuration File
//!
//! ```toml
//! store_url = "https://abc.supabase.co"
//! store_key = "anon-key"
//! payment_secret_key = "sk_test_example"
//! public_origin = "https://beamscience.org"
//! bind_addr = "0.0.0.0:3000"
//! log_format = "json"
//! ```

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::checkout::DEFAULT_STRIPE_API_BASE;
use crate::error::SiteError;
use crate::listing::{FilterSelection, ListingKind, UnknownListing};
use crate::telemetry::{LogFormat, UnknownLogFormat};

const STORE_URL_FALLBACKS: [&str; 2] = ["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
const STORE_KEY_FALLBACKS: [&str; 2] = ["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];
const PAYMENT_KEY_FALLBACK: &str = "STRIPE_SECRET_KEY";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_PUBLIC_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

/// What the binary should do, derived from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Run the HTTP server.
    Serve,
    /// Print one listing and exit.
    List,
    /// Print a listing and reprint it whenever it changes.
    Watch,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use beam_site::BeamConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = BeamConfig::load().expect("failed to load configuration");
/// let store_url = config.resolve_store_url().expect("store URL required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "BEAM",
    discovery(
        dotfile_name = ".beam.toml",
        config_file_name = "beam.toml",
        app_name = "beam"
    )
)]
pub struct BeamConfig {
    /// Listing to print: `projects`, `hubs` or `classes`.
    ///
    /// When absent the server is started.
    #[ortho_config(cli_short = 'l')]
    pub listing: Option<String>,

    /// City filter value.
    #[ortho_config(cli_short = 'c')]
    pub city: Option<String>,

    /// Category filter value (projects and classes).
    #[ortho_config()]
    pub category: Option<String>,

    /// Hub type filter value (hubs only), e.g. `research_center`.
    #[ortho_config()]
    pub hub_type: Option<String>,

    /// Class status filter value (classes only).
    #[ortho_config()]
    pub status: Option<String>,

    /// Keeps the listing open and reprints it on change.
    ///
    /// `ortho_config` does not read booleans from the environment, so this
    /// comes from the CLI (`--watch`/`-w`) or a file.
    #[ortho_config(cli_short = 'w')]
    pub watch: bool,

    /// Runs the HTTP server even when a listing is named.
    ///
    /// `-s` is already claimed by `status`.
    #[ortho_config(cli_short = 'S')]
    pub serve: bool,

    /// Socket address the server binds.
    #[ortho_config()]
    pub bind_addr: String,

    /// Origin used for checkout redirects when a request has no `Origin`
    /// header.
    #[ortho_config()]
    pub public_origin: String,

    /// Base URL of the hosted record store.
    #[ortho_config()]
    pub store_url: Option<String>,

    /// Anonymous API key for the record store.
    #[ortho_config()]
    pub store_key: Option<String>,

    /// Payment processor secret key.
    #[ortho_config()]
    pub payment_secret_key: Option<String>,

    /// Payment processor API base URL.
    #[ortho_config()]
    pub payment_api_base: String,

    /// Bound on a single listing fetch, in seconds.
    #[ortho_config()]
    pub fetch_timeout_secs: u64,

    /// Interval between change polls in watch mode, in seconds.
    #[ortho_config()]
    pub poll_interval_secs: u64,

    /// Path to a template replacing the built-in listing template.
    #[ortho_config()]
    pub template: Option<String>,

    /// Log output: `pretty` or `json`.
    #[ortho_config()]
    pub log_format: String,

    /// Shared secret the change webhook must present.
    #[ortho_config()]
    pub webhook_secret: Option<String>,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            listing: None,
            city: None,
            category: None,
            hub_type: None,
            status: None,
            watch: false,
            serve: false,
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            public_origin: DEFAULT_PUBLIC_ORIGIN.to_owned(),
            store_url: None,
            store_key: None,
            payment_secret_key: None,
            payment_api_base: DEFAULT_STRIPE_API_BASE.to_owned(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            template: None,
            log_format: LogFormat::default().to_string(),
            webhook_secret: None,
        }
    }
}

impl BeamConfig {
    /// Determines the operation mode.
    ///
    /// `Serve` when `serve` is set or no listing is named, `Watch` when a
    /// listing and `watch` are set, `List` otherwise.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.serve || self.listing.is_none() {
            OperationMode::Serve
        } else if self.watch {
            OperationMode::Watch
        } else {
            OperationMode::List
        }
    }

    /// Parses the configured listing name.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Configuration`] when no listing is named or the
    /// name is not recognised.
    pub fn require_listing(&self) -> Result<ListingKind, SiteError> {
        let name = self.listing.as_deref().ok_or_else(|| SiteError::Configuration {
            message: "a listing is required (use --listing or -l)".to_owned(),
        })?;
        name.parse().map_err(|error: UnknownListing| {
            SiteError::Configuration {
                message: error.to_string(),
            }
        })
    }

    /// Filter values named on the command line, keyed by field name.
    ///
    /// Values are passed through as given; the listing decides which are
    /// valid for it.
    #[must_use]
    pub fn requested_filters(&self) -> FilterSelection {
        [
            ("city", &self.city),
            ("category", &self.category),
            ("type", &self.hub_type),
            ("status", &self.status),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|selected| (field, selected)))
        .collect()
    }

    /// Resolves the record store URL, falling back to `SUPABASE_URL` and
    /// `NEXT_PUBLIC_SUPABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Configuration`] when no source provides a value.
    pub fn resolve_store_url(&self) -> Result<String, SiteError> {
        resolve_with_fallbacks(self.store_url.as_deref(), &STORE_URL_FALLBACKS).ok_or_else(|| {
            SiteError::Configuration {
                message: "record store URL is required (set BEAM_STORE_URL or SUPABASE_URL)"
                    .to_owned(),
            }
        })
    }

    /// Resolves the record store API key, falling back to
    /// `SUPABASE_ANON_KEY` and `NEXT_PUBLIC_SUPABASE_ANON_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Configuration`] when no source provides a value.
    pub fn resolve_store_key(&self) -> Result<String, SiteError> {
        resolve_with_fallbacks(self.store_key.as_deref(), &STORE_KEY_FALLBACKS).ok_or_else(|| {
            SiteError::Configuration {
                message: "record store key is required (set BEAM_STORE_KEY or SUPABASE_ANON_KEY)"
                    .to_owned(),
            }
        })
    }

    /// Resolves the payment secret key, falling back to `STRIPE_SECRET_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Configuration`] when no source provides a value.
    pub fn resolve_payment_key(&self) -> Result<String, SiteError> {
        resolve_with_fallbacks(self.payment_secret_key.as_deref(), &[PAYMENT_KEY_FALLBACK])
            .ok_or_else(|| SiteError::Configuration {
                message:
                    "payment secret key is required (set BEAM_PAYMENT_SECRET_KEY or STRIPE_SECRET_KEY)"
                        .to_owned(),
            })
    }

    /// Parses the server bind address.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Configuration`] when the address is malformed.
    pub fn resolve_bind_addr(&self) -> Result<SocketAddr, SiteError> {
        self.bind_addr
            .parse()
            .map_err(|error| SiteError::Configuration {
                message: format!("invalid bind address '{}': {error}", self.bind_addr),
            })
    }

    /// Parses the log format.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Configuration`] for an unknown format.
    pub fn resolve_log_format(&self) -> Result<LogFormat, SiteError> {
        self.log_format
            .parse()
            .map_err(|error: UnknownLogFormat| SiteError::Configuration {
                message: error.to_string(),
            })
    }

    /// Fetch timeout as a duration. Zero is raised to one second.
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }

    /// Poll interval as a duration. Zero is raised to one second.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

fn resolve_with_fallbacks(configured: Option<&str>, fallbacks: &[&str]) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            fallbacks
                .iter()
                .filter_map(|name| env::var(name).ok())
                .map(|value| value.trim().to_owned())
                .find(|value| !value.is_empty())
        })
}

#[cfg(test)]
mod tests;

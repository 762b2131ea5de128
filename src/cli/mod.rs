//! CLI operation mode handlers.
//!
//! - [`listing`]: print one listing and exit
//! - [`watch`]: print a listing and reprint it whenever it changes
//! - [`serve`]: run the HTTP server
//!
//! Output formatting is in [`output`].

use std::fs;
use std::sync::Arc;

use beam_site::{BeamConfig, PostgrestStore, PostgrestStoreConfig, RecordStore, SiteError};

pub mod listing;
pub mod output;
pub mod serve;
pub mod watch;

/// Builds the record store client from configuration.
///
/// # Errors
///
/// Returns [`SiteError::Configuration`] when the store URL or key is missing,
/// and [`SiteError::Store`] when the client cannot be built.
pub fn build_store(config: &BeamConfig) -> Result<Arc<dyn RecordStore>, SiteError> {
    let store_config =
        PostgrestStoreConfig::new(config.resolve_store_url()?, config.resolve_store_key()?)
            .with_timeout(config.fetch_timeout());
    let store = PostgrestStore::new(&store_config)?;
    Ok(Arc::new(store))
}

/// Reads the user template named in configuration, if any.
///
/// # Errors
///
/// Returns [`SiteError::Io`] when the file cannot be read.
pub fn load_template(config: &BeamConfig) -> Result<Option<String>, SiteError> {
    config
        .template
        .as_deref()
        .map(|path| {
            fs::read_to_string(path).map_err(|error| SiteError::Io {
                message: format!("failed to read template '{path}': {error}"),
            })
        })
        .transpose()
}

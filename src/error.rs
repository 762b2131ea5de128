//! Application-level errors for the binary entry points.

use thiserror::Error;

use crate::checkout::PaymentError;
use crate::store::StoreError;

/// Errors that stop the command-line tool or the server.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// What is missing or malformed.
        message: String,
    },

    /// Reading or writing a local stream or file failed.
    #[error("I/O error: {message}")]
    Io {
        /// Underlying error detail.
        message: String,
    },

    /// A listing template failed to parse or render.
    #[error("template error: {message}")]
    Render {
        /// Template error detail.
        message: String,
    },

    /// The HTTP server failed to bind or stopped abnormally.
    #[error("server error: {message}")]
    Server {
        /// Server error detail.
        message: String,
    },

    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The payment processor client could not be set up.
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

impl From<std::io::Error> for SiteError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}

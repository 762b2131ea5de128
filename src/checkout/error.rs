//! Errors raised while opening a checkout session.

use thiserror::Error;

/// Failures talking to the payment processor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The processor could not be reached.
    #[error("network error talking to the payment processor: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The processor rejected the request.
    #[error("payment processor error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The processor answered with an unexpected body.
    #[error("payment processor response could not be decoded: {message}")]
    Decode {
        /// Decoder error detail.
        message: String,
    },

    /// The payment client could not be configured.
    #[error("payment configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

/// Failures of a checkout request as a whole.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The donor's request was rejected before contacting the processor.
    #[error("{message}")]
    Validation {
        /// Message returned to the donor.
        message: String,
    },

    /// The processor failed; detail is logged, not returned.
    #[error(transparent)]
    Upstream(#[from] PaymentError),
}

pub(super) fn extract_payment_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

//! Error types exposed by the record store layer.

use http::StatusCode;
use thiserror::Error;

/// Errors surfaced while querying the hosted record store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Networking failed while calling the store.
    #[error("network error talking to the record store: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The store did not answer within the configured bound.
    #[error("record store did not answer within {seconds}s")]
    Timeout {
        /// The timeout that elapsed, in whole seconds.
        seconds: u64,
    },

    /// The API key was rejected.
    #[error("record store rejected the API key: {message}")]
    Authentication {
        /// Message returned with the 401/403 response.
        message: String,
    },

    /// The store returned a non-authentication error status.
    #[error("record store error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The response body did not match the expected record shape.
    #[error("record store response could not be decoded: {message}")]
    Decode {
        /// Decoder error detail.
        message: String,
    },

    /// The store client could not be configured.
    #[error("record store configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

pub(super) fn map_http_error(
    table: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> StoreError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if is_auth_failure(status) {
        StoreError::Authentication {
            message: format!("querying {table} failed: {message}"),
        }
    } else {
        StoreError::Api {
            status: status.as_u16(),
            message: format!("querying {table} failed: {message}"),
        }
    }
}

pub(super) fn map_transport_error(
    table: &str,
    error: &reqwest::Error,
    timeout_seconds: u64,
) -> StoreError {
    if error.is_timeout() {
        return StoreError::Timeout {
            seconds: timeout_seconds,
        };
    }
    StoreError::Network {
        message: format!("querying {table} failed: {error}"),
    }
}

/// Pulls the `message` field out of a PostgREST error body.
pub(super) fn extract_store_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use rstest::rstest;

    use super::{StoreError, extract_store_message, map_http_error};

    #[rstest]
    #[case::unauthorised(StatusCode::UNAUTHORIZED)]
    #[case::forbidden(StatusCode::FORBIDDEN)]
    fn auth_statuses_map_to_authentication(#[case] status: StatusCode) {
        let error = map_http_error("science_hubs", status, Some("bad key".to_owned()));

        assert!(
            matches!(error, StoreError::Authentication { .. }),
            "expected Authentication, got {error:?}"
        );
    }

    #[rstest]
    fn other_statuses_keep_the_code() {
        let error = map_http_error("science_hubs", StatusCode::NOT_FOUND, None);

        assert_eq!(
            error,
            StoreError::Api {
                status: 404,
                message: "querying science_hubs failed: unknown error".to_owned(),
            }
        );
    }

    #[rstest]
    #[case::postgrest_body(
        r#"{"code":"42P01","message":"relation does not exist"}"#,
        Some("relation does not exist")
    )]
    #[case::not_json("<html>oops</html>", None)]
    #[case::no_message(r#"{"code":"42P01"}"#, None)]
    fn extracts_message_from_error_bodies(#[case] body: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_store_message(body).as_deref(), expected);
    }
}

//! Error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::checkout::CheckoutError;

/// Failure returned by a handler, rendered as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request was malformed or failed validation.
    #[error("{message}")]
    BadRequest {
        /// Message shown to the caller.
        message: String,
    },

    /// The caller did not present the expected credential.
    #[error("Unauthorized")]
    Unauthorized,

    /// The addressed resource does not exist.
    #[error("{message}")]
    NotFound {
        /// Message shown to the caller.
        message: String,
    },

    /// Something failed on our side or upstream. Details are logged, never
    /// returned.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<CheckoutError> for ApiError {
    fn from(error: CheckoutError) -> Self {
        match error {
            CheckoutError::Validation { message } => Self::BadRequest { message },
            CheckoutError::Upstream(_) => Self::Internal,
        }
    }
}

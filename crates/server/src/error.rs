//! Unified error handling with Sentry integration.
//!
//! Every failure a request can hit ends up as an `AppError`. Server-side
//! errors are captured to Sentry and logged before the response is written.
//! Handlers render errors through the configured [`ResponseFormat`] with
//! [`AppError::render`]; the `IntoResponse` impl uses the default format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use intake_core::RequiredFields;

use crate::db::StoreError;
use crate::models::SubmissionError;
use crate::response::ResponseFormat;
use crate::services::ReconcileError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// The submission failed validation. Client error, never retried.
    #[error(transparent)]
    Validation(#[from] SubmissionError),

    /// The store failed. The caller may retry.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// The request body's content type is not accepted.
    #[error("Unsupported content type: {0}")]
    UnsupportedMediaType(String),

    /// The request body exceeds the body size limit.
    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    /// Anything else, such as a body that does not parse.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<ReconcileError> for AppError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::MissingKey => {
                let mut check = RequiredFields::default();
                check.mark_missing("phone_id");
                Self::Validation(check.into_missing().into())
            }
            ReconcileError::Store(e) => Self::Storage(e),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Storage(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Storage(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Render the error in `format`, reporting server errors first.
    #[must_use]
    pub fn render(self, format: ResponseFormat) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        match &self {
            Self::Validation(err) => format.failure(status, &err.to_string(), None),
            Self::Storage(StoreError::Conflict(detail)) => format.failure(
                status,
                "Record was written concurrently, retry the request",
                Some(detail),
            ),
            Self::Storage(err) => format.failure(status, "Storage error", Some(&err.to_string())),
            Self::UnsupportedMediaType(_) => format.failure(status, &self.to_string(), None),
            Self::PayloadTooLarge(detail) => {
                format.failure(status, "Request body too large", Some(detail))
            }
            Self::Unexpected(detail) => format.failure(status, "Unexpected error", Some(detail)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.render(ResponseFormat::default())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

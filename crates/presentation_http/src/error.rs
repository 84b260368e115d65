//! API error handling
//!
//! Maps application errors to HTTP status codes and JSON error bodies. In
//! production mode internal error details are left out of responses.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Public message for failures the caller cannot act on
pub const FETCH_FAILED: &str = "Failed to fetch commute data";

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether internal error details should be exposed in responses.
///
/// Set to `false` in production.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The calendar needs (re-)authorization; the body carries `needsAuth`
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Set when the client should send the user through calendar sign-in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_auth: Option<bool>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: msg,
                    code: "bad_request".to_string(),
                    details: None,
                    needs_auth: None,
                },
            ),
            Self::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    error: msg,
                    code: "unauthorized".to_string(),
                    details: None,
                    needs_auth: Some(true),
                },
            ),
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: msg,
                    code: "not_found".to_string(),
                    details: None,
                    needs_auth: None,
                },
            ),
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: FETCH_FAILED.to_string(),
                    code: "internal_error".to_string(),
                    details: should_expose_details().then_some(msg),
                    needs_auth: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::NotAuthenticated | ApplicationError::AuthenticationExpired => {
                Self::Unauthorized(err.to_string())
            },
            ApplicationError::Domain(e) => Self::Internal(e.to_string()),
            ApplicationError::ExternalService(msg)
            | ApplicationError::Configuration(msg)
            | ApplicationError::Internal(msg) => Self::Internal(msg),
        }
    }
}

//! Application-level errors

use domain::DomainError;
use thiserror::Error;

use crate::ports::CalendarError;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Nothing to plan a commute for, or nothing found
    #[error("{0}")]
    NotFound(String),

    /// No calendar credentials are available
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Calendar credentials were rejected and have been discarded
    #[error("Authentication expired")]
    AuthenticationExpired,

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService(_))
    }

    /// Whether the caller has to sign in again before retrying
    pub const fn needs_auth(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::AuthenticationExpired)
    }
}

impl From<CalendarError> for ApplicationError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::NotAuthenticated => Self::NotAuthenticated,
            CalendarError::AuthenticationExpired => Self::AuthenticationExpired,
            other => Self::ExternalService(other.to_string()),
        }
    }
}

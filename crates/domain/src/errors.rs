//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinates outside the valid WGS84 range
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// A route summary that would violate its invariants
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// Date/time parsing error
    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),
}

impl From<crate::value_objects::InvalidCoordinates> for DomainError {
    fn from(err: crate::value_objects::InvalidCoordinates) -> Self {
        Self::InvalidCoordinates(err.to_string())
    }
}

//! Transit error types

use thiserror::Error;

/// Errors that can occur while talking to the journey planner
#[derive(Debug, Error)]
pub enum TransitError {
    /// Connection to the journey planner failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the journey planner failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from the journey planner
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The GraphQL endpoint answered with an `errors` array
    #[error("Journey planner query failed: {0}")]
    QueryFailed(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// The arrival time could not be interpreted
    #[error("Invalid arrival time: {0}")]
    InvalidArrivalTime(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl TransitError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}

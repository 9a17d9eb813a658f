use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for nexus operations
pub type Result<T> = std::result::Result<T, NexusError>;

/// Errors that can terminate a lookup request
#[derive(Error, Debug)]
pub enum NexusError {
    /// Input was empty after trimming
    #[error("empty input")]
    EmptyInput,

    /// Input is neither an IPv4 address nor a parseable URL
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A domain target resolved to no IPv4 address
    #[error("could not resolve an IPv4 address for {host}")]
    ResolutionFailed {
        /// The hostname that failed to resolve
        host: String,
    },

    /// Caller exceeded a rate limit quota
    #[error("rate limit exceeded ({scope})")]
    RateLimited {
        /// Which quota was exhausted ("caller" or "global")
        scope: &'static str,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Operation timed out
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl NexusError {
    /// Returns true for the user-correctable request errors
    #[must_use]
    pub const fn is_terminal_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::InvalidInput(_) | Self::ResolutionFailed { .. }
        )
    }

    /// HTTP-equivalent status code for this error
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::EmptyInput | Self::InvalidInput(_) | Self::ResolutionFailed { .. } => 400,
            Self::RateLimited { .. } => 429,
            _ => 500,
        }
    }
}

/// Serialized error shape returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short, stable error message
    pub error: String,

    /// Optional detail string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&NexusError> for ErrorBody {
    fn from(err: &NexusError) -> Self {
        let (error, details) = match err {
            NexusError::EmptyInput => ("Empty input".to_string(), None),
            NexusError::InvalidInput(reason) => ("Invalid URL".to_string(), Some(reason.clone())),
            NexusError::ResolutionFailed { host } => (format!("Could not resolve IP for {host}"), None),
            NexusError::RateLimited { scope } => (
                "Too many requests".to_string(),
                Some(format!("{scope} quota exhausted")),
            ),
            other => ("Lookup Failed".to_string(), Some(other.to_string())),
        };
        Self { error, details }
    }
}

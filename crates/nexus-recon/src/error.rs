use thiserror::Error;

/// Result type alias for reconnaissance backends
pub type ReconResult<T> = std::result::Result<T, ReconError>;

/// Errors from reconnaissance backends.
///
/// Backend failures never reach a lookup caller directly: the probe wrappers
/// collapse them into empty or absent values.
#[derive(Error, Debug)]
pub enum ReconError {
    /// DNS resolution error
    #[error("DNS error: {0}")]
    Dns(String),

    /// Port specification could not be parsed
    #[error("invalid port specification: {0}")]
    InvalidPorts(String),

    /// Network I/O error
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),
}

impl From<ReconError> for nexus_core::NexusError {
    fn from(err: ReconError) -> Self {
        match err {
            ReconError::Dns(msg) => Self::Dns(msg),
            ReconError::InvalidPorts(msg) => Self::InvalidInput(msg),
            ReconError::Network(e) => Self::Internal(format!("network error: {e}")),
        }
    }
}

/// Error types reported by external collaborators
use thiserror::Error;

/// Result type alias for media resolution
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Media resolution failure
///
/// Every variant is recoverable from the playback engine's point of view:
/// the affected track is marked unplayable and skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Transient network failure (timeouts, DNS, connection reset)
    #[error("Network error: {0}")]
    Network(String),

    /// Video or playlist does not exist or is private
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL is not something the resolver handles
    #[error("Unsupported URL: {0}")]
    Unsupported(String),

    /// Resolver returned data it could not interpret
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ResolveError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Voice transport failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// Voice connection dropped
    #[error("Voice connection lost: {0}")]
    Disconnected(String),

    /// Audio could not be encoded for the transport
    #[error("Encode error: {0}")]
    Encode(String),

    /// Any other transport-level failure
    #[error("Transport error: {0}")]
    Transport(String),
}

impl SinkError {
    /// Create a disconnected error
    pub fn disconnected(msg: impl Into<String>) -> Self {
        Self::Disconnected(msg.into())
    }

    /// Create an encode error
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

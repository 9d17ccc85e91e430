//! Error types for filingwatch

/// Result type alias using filingwatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for filingwatch operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network errors talking to the update stream or the destination chat
    #[error("transport error: {0}")]
    Transport(String),

    /// A tag outside the event-type vocabulary
    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    /// Filesystem errors (label log, offset file)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Whether this error came from the network layer rather than local state
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

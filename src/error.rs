//! Error types for the subscription engine.

use thiserror::Error;

/// Main error type for subscription operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Client disconnected")]
    Disconnected,

    #[error("Unsupported command in subscription mode: {0}")]
    UnsupportedCommand(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Cancelled by shutdown")]
    Cancelled,
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Serialization(e.to_string())
    }
}

impl SyncError {
    /// Short machine-readable tag used in the wire error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Io(_) => "io",
            SyncError::Disconnected => "disconnected",
            SyncError::UnsupportedCommand(_) => "unsupported_command",
            SyncError::Serialization(_) => "serialization",
            SyncError::MalformedSnapshot(_) => "malformed_snapshot",
            SyncError::Cancelled => "cancelled",
        }
    }
}

/// Result type for subscription operations.
pub type Result<T> = std::result::Result<T, SyncError>;

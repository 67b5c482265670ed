//! Error types for session tracking.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The persisted session record exists but does not decode.
    #[error("Malformed session record: {0}")]
    Malformed(#[source] serde_json::Error),

    /// An operation needed a session record and there was none.
    #[error("No active session")]
    NoSession,

    /// The session passed a deadline and can no longer be extended.
    #[error("Session has expired")]
    Expired,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The sign-out side effect failed.
    #[error("Sign-out failed: {0}")]
    Termination(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;

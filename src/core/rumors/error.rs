//! Error types for rumor operations.

use thiserror::Error;

use crate::core::backend::StoreError;

#[derive(Debug, Error)]
pub enum RumorError {
    /// No signed-in actor; raised before any store call.
    #[error("must be authenticated to {0}")]
    Unauthenticated(&'static str),

    #[error("Rumor not found: {0}")]
    NotFound(String),

    #[error("at least {required} rumors are required, got {found}")]
    NotEnoughRumors { required: usize, found: usize },

    /// The combined rumor's id would overwrite one of its own sources.
    #[error("combined rumor id {0} collides with a source rumor")]
    IdCollision(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RumorError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}

pub type Result<T> = std::result::Result<T, RumorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RumorError::Unauthenticated("update rumor status").to_string(),
            "must be authenticated to update rumor status"
        );
        assert_eq!(
            RumorError::NotEnoughRumors { required: 2, found: 1 }.to_string(),
            "at least 2 rumors are required, got 1"
        );
        assert_eq!(RumorError::not_found("ghost-ship").to_string(), "Rumor not found: ghost-ship");
        assert_eq!(
            RumorError::IdCollision("red-sky".to_string()).to_string(),
            "combined rumor id red-sky collides with a source rumor"
        );
    }

    #[test]
    fn test_store_errors_pass_through() {
        let err: RumorError = StoreError::backend("offline").into();
        assert_eq!(err.to_string(), "Backend error: offline");
    }
}

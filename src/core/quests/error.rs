//! Error types for quest operations.

use thiserror::Error;

use crate::core::backend::StoreError;

#[derive(Debug, Error)]
pub enum QuestError {
    #[error("must be authenticated to {0}")]
    Unauthenticated(&'static str),

    #[error("Quest not found: {0}")]
    NotFound(String),

    #[error("Objective {objective_id} not found on quest {quest_id}")]
    ObjectiveNotFound { quest_id: String, objective_id: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuestError>;

//! Quests
//!
//! Objective-bearing tasks, created from a form or derived from rumors.

pub mod error;
pub mod store;
pub mod types;

pub use error::QuestError;
pub use store::QuestStore;
pub use types::{Quest, QuestDraft, QuestObjective, QuestReference, QuestStatus, UNTITLED_QUEST};

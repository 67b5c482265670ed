//! Rumors
//!
//! Unverified in-world information the party has picked up, with a status
//! lifecycle and links to NPCs and locations. [`RumorStore`] owns the
//! in-memory view and mediates all writes; two workflows build on it:
//!
//! - **combine** folds two or more rumors into a new one and marks the
//!   originals confirmed
//! - **convert** derives a quest from one or more rumors and leaves a
//!   back-reference on each

pub mod batch;
pub mod error;
pub mod store;
pub mod types;
mod workflows;

pub use batch::{BatchEntry, BatchReport, CombineOutcome, ConversionOutcome};
pub use error::RumorError;
pub use store::{rumor_id_for, RumorStore};
pub use types::{CombineOptions, NewRumor, Rumor, RumorNote, RumorSource, RumorStatus};
pub use workflows::{combined_content, combined_title, COMBINED_SOURCE_NAME, MIN_COMBINE_SOURCES};

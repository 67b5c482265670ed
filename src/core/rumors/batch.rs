//! Per-record results for multi-record writes.
//!
//! Combine and convert update every source rumor one at a time. Those writes
//! are not transactional: an earlier success is never rolled back when a
//! later write fails. [`BatchReport`] records what happened to each record so
//! the caller can reconcile by hand.

use std::fmt;

/// Outcome of one write in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub id: String,
    /// `None` on success, the error message on failure.
    pub error: Option<String>,
}

impl BatchEntry {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, id: impl Into<String>) {
        self.entries.push(BatchEntry {
            id: id.into(),
            error: None,
        });
    }

    pub fn record_failure(&mut self, id: impl Into<String>, error: impl fmt::Display) {
        self.entries.push(BatchEntry {
            id: id.into(),
            error: Some(error.to_string()),
        });
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// True when every write in the batch succeeded.
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(BatchEntry::succeeded)
    }

    pub fn succeeded_ids(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.succeeded())
            .map(|e| e.id.as_str())
            .collect()
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.succeeded())
            .map(|e| e.id.as_str())
            .collect()
    }
}

/// Result of combining rumors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineOutcome {
    /// Id of the newly created rumor.
    pub rumor_id: String,
    /// Per-source status/note updates.
    pub sources: BatchReport,
}

/// Result of converting rumors into a quest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    /// Id of the newly created quest.
    pub quest_id: String,
    /// Per-source back-reference updates.
    pub sources: BatchReport,
}

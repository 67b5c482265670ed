//! Backing document store
//!
//! Campaign records live in a hosted, key-addressed document database with
//! one collection per entity type. The rest of the crate only talks to it
//! through [`DocumentStore`]:
//!
//! - `list_all` - bulk read used to refresh in-memory snapshots
//! - `get` - single-record read
//! - `set` - full replacement (create or overwrite)
//! - `update` - shallow merge of top-level fields into an existing record
//! - `delete` - permanent removal, no tombstone
//!
//! Two implementations ship with the crate: [`MemoryDocumentStore`] for
//! tests and embedding, and [`JsonFileStore`] which keeps one JSON file per
//! collection on disk.

pub mod error;
pub mod json_file;
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use error::{StoreError, StoreResult};
pub use json_file::JsonFileStore;
pub use memory::MemoryDocumentStore;

/// A stored record: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Entity collections in the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Rumors,
    Quests,
    Npcs,
    Locations,
    Chapters,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Rumors,
        Collection::Quests,
        Collection::Npcs,
        Collection::Locations,
        Collection::Chapters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Rumors => "rumors",
            Collection::Quests => "quests",
            Collection::Npcs => "npcs",
            Collection::Locations => "locations",
            Collection::Chapters => "chapters",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-addressed document collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every record in a collection, paired with its id.
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<(String, Document)>>;

    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;

    /// Create or fully replace a record.
    async fn set(&self, collection: Collection, id: &str, record: Document) -> StoreResult<()>;

    /// Merge `partial`'s top-level fields into an existing record.
    ///
    /// Fails with [`StoreError::NotFound`] if the record does not exist.
    async fn update(&self, collection: Collection, id: &str, partial: Document) -> StoreResult<()>;

    /// Remove a record. Removing a missing record is not an error.
    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()>;

    /// Short backend name used in log lines.
    fn name(&self) -> &str;
}

/// Shallow-merge `partial` into `target`, replacing whole top-level values.
pub(crate) fn merge_fields(target: &mut Document, partial: Document) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}

/// Serialize a value that must encode as a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::backend(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_names() {
        let names: Vec<&str> = Collection::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["rumors", "quests", "npcs", "locations", "chapters"]);
        assert_eq!(Collection::Quests.to_string(), "quests");
    }

    #[test]
    fn test_merge_fields_is_shallow() {
        let mut target = to_document(&json!({"a": 1, "nested": {"x": 1, "y": 2}})).unwrap();
        let partial = to_document(&json!({"nested": {"x": 9}, "b": true})).unwrap();
        merge_fields(&mut target, partial);

        assert_eq!(target["a"], json!(1));
        assert_eq!(target["b"], json!(true));
        assert_eq!(target["nested"], json!({"x": 9}));
    }

    #[test]
    fn test_to_document_rejects_non_objects() {
        let err = to_document(&vec![1, 2, 3]).unwrap_err();
        assert!(err.to_string().contains("array"));
    }
}

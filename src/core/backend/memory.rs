//! In-memory document store.

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::{merge_fields, Collection, Document, DocumentStore, StoreError, StoreResult};

/// Document store held entirely in memory.
///
/// Records keep their insertion order within a collection so `list_all`
/// is stable across calls.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, IndexMap<String, Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map(IndexMap::len)
            .unwrap_or(0)
    }

    /// Clone of a whole collection, for assertions and export.
    pub async fn snapshot(&self, collection: Collection) -> IndexMap<String, Document> {
        self.collections
            .read()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<(String, Document)>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).and_then(|docs| docs.get(id).cloned()))
    }

    async fn set(&self, collection: Collection, id: &str, record: Document) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .insert(id.to_string(), record);
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &str, partial: Document) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        merge_fields(doc, partial);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(&collection) {
            docs.shift_remove(id);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::to_document;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        to_document(&value).unwrap()
    }

    #[tokio::test]
    async fn test_set_get_and_list_in_order() {
        let store = MemoryDocumentStore::new();
        store.set(Collection::Rumors, "b", doc(json!({"title": "B"}))).await.unwrap();
        store.set(Collection::Rumors, "a", doc(json!({"title": "A"}))).await.unwrap();

        let got = store.get(Collection::Rumors, "a").await.unwrap().unwrap();
        assert_eq!(got["title"], json!("A"));

        let ids: Vec<String> = store
            .list_all(Collection::Rumors)
            .await
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);

        assert!(store.list_all(Collection::Quests).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_and_requires_existing() {
        let store = MemoryDocumentStore::new();
        store
            .set(Collection::Rumors, "r1", doc(json!({"title": "T", "status": "unconfirmed"})))
            .await
            .unwrap();

        store
            .update(Collection::Rumors, "r1", doc(json!({"status": "confirmed"})))
            .await
            .unwrap();
        let got = store.get(Collection::Rumors, "r1").await.unwrap().unwrap();
        assert_eq!(got["status"], json!("confirmed"));
        assert_eq!(got["title"], json!("T"));

        let err = store
            .update(Collection::Rumors, "missing", doc(json!({"status": "false"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryDocumentStore::new();
        store.set(Collection::Quests, "q1", doc(json!({}))).await.unwrap();
        assert_eq!(store.count(Collection::Quests).await, 1);

        store.delete(Collection::Quests, "q1").await.unwrap();
        store.delete(Collection::Quests, "q1").await.unwrap();
        assert_eq!(store.count(Collection::Quests).await, 0);
    }
}

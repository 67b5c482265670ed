//! Mock implementations for testing
//!
//! Test doubles for the storage and sign-out seams.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use mockall::mock;

use crate::core::auth::{SessionTerminator, SignOutReason};
use crate::core::backend::{
    Collection, Document, DocumentStore, MemoryDocumentStore, StoreError, StoreResult,
};

// ============================================================================
// Flaky Document Store
// ============================================================================

/// Memory store whose `update` fails for chosen record ids.
///
/// Used to exercise partial failure in multi-record workflows.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryDocumentStore,
    failing_updates: Mutex<HashSet<String>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_updates_for(&self, id: &str) {
        self.failing_updates
            .lock()
            .unwrap()
            .insert(id.to_string());
    }

    fn should_fail(&self, id: &str) -> bool {
        self.failing_updates.lock().unwrap().contains(id)
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<(String, Document)>> {
        self.inner.list_all(collection).await
    }

    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        self.inner.get(collection, id).await
    }

    async fn set(&self, collection: Collection, id: &str, record: Document) -> StoreResult<()> {
        self.inner.set(collection, id, record).await
    }

    async fn update(&self, collection: Collection, id: &str, partial: Document) -> StoreResult<()> {
        if self.should_fail(id) {
            return Err(StoreError::backend(format!("simulated write failure for {id}")));
        }
        self.inner.update(collection, id, partial).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        self.inner.delete(collection, id).await
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

// ============================================================================
// Session Terminator Mock
// ============================================================================

mock! {
    pub Terminator {}

    #[async_trait]
    impl SessionTerminator for Terminator {
        async fn terminate(&self, reason: SignOutReason) -> Result<(), String>;
    }
}

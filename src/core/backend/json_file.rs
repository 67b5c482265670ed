//! File-backed document store.
//!
//! Each collection is a single `<collection>.json` file holding an object of
//! `id -> record`. Writes go to a sibling temp file that is then renamed over
//! the original, so a crash mid-write leaves the previous contents intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::{merge_fields, Collection, Document, DocumentStore, StoreError, StoreResult};

type CollectionFile = IndexMap<String, Document>;

/// Document store persisting each collection as a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
    /// Serializes read-modify-write cycles across collections.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "Opened JSON file store");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, collection: Collection) -> PathBuf {
        self.root.join(format!("{}.json", collection.as_str()))
    }

    async fn read_collection(&self, collection: Collection) -> StoreResult<CollectionFile> {
        let path = self.path_for(collection);
        match fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Ok(CollectionFile::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CollectionFile::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn write_collection(&self, collection: Collection, docs: &CollectionFile) -> StoreResult<()> {
        let path = self.path_for(collection);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(docs)?;
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<(String, Document)>> {
        Ok(self.read_collection(collection).await?.into_iter().collect())
    }

    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        Ok(self.read_collection(collection).await?.shift_remove(id))
    }

    #[instrument(skip(self, record))]
    async fn set(&self, collection: Collection, id: &str, record: Document) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.read_collection(collection).await?;
        docs.insert(id.to_string(), record);
        self.write_collection(collection, &docs).await
    }

    #[instrument(skip(self, partial))]
    async fn update(&self, collection: Collection, id: &str, partial: Document) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.read_collection(collection).await?;
        let doc = docs
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        merge_fields(doc, partial);
        self.write_collection(collection, &docs).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.read_collection(collection).await?;
        if docs.shift_remove(id).is_some() {
            self.write_collection(collection, &docs).await?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

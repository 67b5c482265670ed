//! Rumor Store
//!
//! Owns the in-memory view of the `rumors` collection and routes every
//! mutation through the backing [`DocumentStore`], stamping the acting
//! user's identity and the current time on the way. Reads are served from
//! the snapshot; each write is followed by a full [`RumorStore::refresh`].

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::error::{Result, RumorError};
use super::types::{NewRumor, Rumor, RumorNote, RumorStatus};
use crate::core::auth::{Actor, ActorProvider};
use crate::core::backend::{to_document, Collection, Document, DocumentStore};
use crate::core::clock::Clock;
use crate::core::slug::slugify_non_empty;

/// Fields rewritten by every modification.
pub(super) const MODIFICATION_FIELDS: [&str; 3] = ["dateModified", "modifiedBy", "modifiedByName"];

/// Service object owning the rumor snapshot.
///
/// Construct once per signed-in session and share by `Arc`.
pub struct RumorStore {
    pub(super) store: Arc<dyn DocumentStore>,
    pub(super) actors: Arc<dyn ActorProvider>,
    pub(super) clock: Arc<dyn Clock>,
    rumors: RwLock<IndexMap<String, Rumor>>,
}

impl RumorStore {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        actors: Arc<dyn ActorProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            actors,
            clock,
            rumors: RwLock::new(IndexMap::new()),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    fn snapshot(&self) -> RwLockReadGuard<'_, IndexMap<String, Rumor>> {
        self.rumors.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_by_id(&self, id: &str) -> Option<Rumor> {
        self.snapshot().get(id).cloned()
    }

    /// All rumors, in the order the backing store listed them.
    pub fn list(&self) -> Vec<Rumor> {
        self.snapshot().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn get_by_status(&self, status: RumorStatus) -> Vec<Rumor> {
        self.filtered(|r| r.status == status)
    }

    /// Rumors heard at, or related to, a location.
    pub fn get_by_location(&self, location_id: &str) -> Vec<Rumor> {
        self.filtered(|r| r.involves_location(location_id))
    }

    /// Rumors sourced from, or related to, an NPC.
    pub fn get_by_npc(&self, npc_id: &str) -> Vec<Rumor> {
        self.filtered(|r| r.involves_npc(npc_id))
    }

    /// Rumors that have not been turned into a quest.
    pub fn active(&self) -> Vec<Rumor> {
        self.filtered(|r| !r.is_converted())
    }

    fn filtered(&self, predicate: impl Fn(&Rumor) -> bool) -> Vec<Rumor> {
        self.snapshot()
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    // ========================================================================
    // Synchronization
    // ========================================================================

    /// Reload the snapshot from the backing store.
    ///
    /// Documents that do not decode as rumors are skipped with a warning.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let docs = self.store.list_all(Collection::Rumors).await?;
        let mut fresh = IndexMap::with_capacity(docs.len());

        for (id, mut doc) in docs {
            doc.entry("id").or_insert_with(|| Value::String(id.clone()));
            match serde_json::from_value::<Rumor>(Value::Object(doc)) {
                Ok(mut rumor) => {
                    rumor.id = id.clone();
                    fresh.insert(id, rumor);
                }
                Err(e) => warn!(rumor_id = %id, error = %e, "Skipping malformed rumor document"),
            }
        }

        debug!(count = fresh.len(), "Rumor snapshot refreshed");
        *self.rumors.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        Ok(())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub(super) fn require_actor(&self, action: &'static str) -> Result<Actor> {
        self.actors
            .current_actor()
            .ok_or(RumorError::Unauthenticated(action))
    }

    pub(super) fn require(&self, id: &str) -> Result<Rumor> {
        self.get_by_id(id).ok_or_else(|| RumorError::not_found(id))
    }

    /// Write the named fields of `rumor`, plus modification metadata.
    pub(super) async fn patch(&self, rumor: &Rumor, fields: &[&str]) -> Result<()> {
        let partial: Document = to_document(rumor)?
            .into_iter()
            .filter(|(key, _)| {
                fields.contains(&key.as_str()) || MODIFICATION_FIELDS.contains(&key.as_str())
            })
            .collect();
        self.store.update(Collection::Rumors, &rumor.id, partial).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: RumorStatus) -> Result<()> {
        let actor = self.require_actor("update rumor status")?;
        let mut rumor = self.require(id)?;

        rumor.status = status;
        rumor.touch(&actor, self.clock.now());
        self.patch(&rumor, &["status"]).await?;

        info!(rumor_id = %id, "Rumor status updated");
        self.refresh().await
    }

    #[instrument(skip(self, content))]
    pub async fn add_note(&self, id: &str, content: &str) -> Result<()> {
        let actor = self.require_actor("add notes to rumors")?;
        let mut rumor = self.require(id)?;
        let now = self.clock.now();

        rumor.notes.push(RumorNote::by(&actor, content, now));
        rumor.touch(&actor, now);
        self.patch(&rumor, &["notes"]).await?;

        info!(rumor_id = %id, notes = rumor.notes.len(), "Note added to rumor");
        self.refresh().await
    }

    /// Create a rumor and return its id.
    #[instrument(skip(self, data), fields(title = %data.title))]
    pub async fn add(&self, data: NewRumor) -> Result<String> {
        let actor = self.require_actor("add rumors")?;
        let id = rumor_id_for(&data.title);

        if self.snapshot().contains_key(&id) {
            warn!(rumor_id = %id, "A rumor with this id already exists and will be replaced");
        }

        let rumor = data.into_rumor(id.clone(), &actor, self.clock.now());
        self.store
            .set(Collection::Rumors, &id, to_document(&rumor)?)
            .await?;

        info!(rumor_id = %id, "Rumor added");
        self.refresh().await?;
        Ok(id)
    }

    /// Replace a rumor wholesale.
    #[instrument(skip(self, rumor), fields(rumor_id = %rumor.id))]
    pub async fn update(&self, mut rumor: Rumor) -> Result<()> {
        let actor = self.require_actor("update rumors")?;
        self.require(&rumor.id)?;

        rumor.touch(&actor, self.clock.now());
        self.store
            .set(Collection::Rumors, &rumor.id, to_document(&rumor)?)
            .await?;

        info!("Rumor updated");
        self.refresh().await
    }

    /// Permanently remove a rumor. Fails with `NotFound` for ids the
    /// snapshot does not know.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let _actor = self.require_actor("delete rumors")?;
        self.require(id)?;

        self.store.delete(Collection::Rumors, id).await?;

        info!(rumor_id = %id, "Rumor deleted");
        self.refresh().await
    }
}

/// Id for a rumor titled `title`.
///
/// Titles without any usable characters get a random id instead of an
/// empty one.
pub fn rumor_id_for(title: &str) -> String {
    slugify_non_empty(title).unwrap_or_else(|| Uuid::new_v4().to_string())
}

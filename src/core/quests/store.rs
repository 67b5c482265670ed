//! Quest Store
//!
//! Snapshot-plus-backing-store service for the `quests` collection, shaped
//! like the rumor store. Quests converted from rumors are written by the
//! rumor workflows directly; call [`QuestStore::refresh`] afterwards to see
//! them here.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::error::{QuestError, Result};
use super::types::{Quest, QuestDraft, QuestStatus};
use crate::core::auth::{Actor, ActorProvider};
use crate::core::backend::{to_document, Collection, DocumentStore};
use crate::core::clock::Clock;

pub struct QuestStore {
    store: Arc<dyn DocumentStore>,
    actors: Arc<dyn ActorProvider>,
    clock: Arc<dyn Clock>,
    quests: RwLock<IndexMap<String, Quest>>,
}

impl QuestStore {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        actors: Arc<dyn ActorProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            actors,
            clock,
            quests: RwLock::new(IndexMap::new()),
        }
    }

    fn snapshot(&self) -> RwLockReadGuard<'_, IndexMap<String, Quest>> {
        self.quests.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_by_id(&self, id: &str) -> Option<Quest> {
        self.snapshot().get(id).cloned()
    }

    pub fn list(&self) -> Vec<Quest> {
        self.snapshot().values().cloned().collect()
    }

    pub fn get_by_status(&self, status: QuestStatus) -> Vec<Quest> {
        self.snapshot()
            .values()
            .filter(|q| q.status == status)
            .cloned()
            .collect()
    }

    /// Quests derived from a given rumor.
    pub fn derived_from(&self, rumor_id: &str) -> Vec<Quest> {
        self.snapshot()
            .values()
            .filter(|q| q.source_rumors.iter().any(|r| r == rumor_id))
            .cloned()
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let docs = self.store.list_all(Collection::Quests).await?;
        let mut fresh = IndexMap::with_capacity(docs.len());

        for (id, mut doc) in docs {
            doc.entry("id").or_insert_with(|| Value::String(id.clone()));
            match serde_json::from_value::<Quest>(Value::Object(doc)) {
                Ok(mut quest) => {
                    quest.id = id.clone();
                    fresh.insert(id, quest);
                }
                Err(e) => warn!(quest_id = %id, error = %e, "Skipping malformed quest document"),
            }
        }

        debug!(count = fresh.len(), "Quest snapshot refreshed");
        *self.quests.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        Ok(())
    }

    fn require_actor(&self, action: &'static str) -> Result<Actor> {
        self.actors
            .current_actor()
            .ok_or(QuestError::Unauthenticated(action))
    }

    fn require(&self, id: &str) -> Result<Quest> {
        self.get_by_id(id)
            .ok_or_else(|| QuestError::NotFound(id.to_string()))
    }

    async fn write(&self, quest: &Quest) -> Result<()> {
        self.store
            .set(Collection::Quests, &quest.id, to_document(quest)?)
            .await?;
        Ok(())
    }

    /// Create a quest from a form draft and return its id.
    #[instrument(skip(self, draft))]
    pub async fn add(&self, draft: QuestDraft) -> Result<String> {
        let actor = self.require_actor("add quests")?;
        let id = draft.quest_id();
        let quest = draft.build(id.clone(), &actor, self.clock.now());

        self.write(&quest).await?;
        info!(quest_id = %id, "Quest added");
        self.refresh().await?;
        Ok(id)
    }

    #[instrument(skip(self, quest), fields(quest_id = %quest.id))]
    pub async fn update(&self, mut quest: Quest) -> Result<()> {
        let actor = self.require_actor("update quests")?;
        self.require(&quest.id)?;
        quest.touch(&actor, self.clock.now());

        self.write(&quest).await?;
        info!("Quest updated");
        self.refresh().await
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: QuestStatus) -> Result<()> {
        let actor = self.require_actor("update quest status")?;
        let mut quest = self.require(id)?;

        quest.status = status;
        quest.touch(&actor, self.clock.now());
        self.write(&quest).await?;
        info!(quest_id = %id, status = status.as_str(), "Quest status updated");
        self.refresh().await
    }

    /// Flip an objective's completion flag. Returns the new value.
    #[instrument(skip(self))]
    pub async fn toggle_objective(&self, quest_id: &str, objective_id: &str) -> Result<bool> {
        let actor = self.require_actor("update quest objectives")?;
        let mut quest = self.require(quest_id)?;

        let objective = quest
            .objectives
            .iter_mut()
            .find(|o| o.id == objective_id)
            .ok_or_else(|| QuestError::ObjectiveNotFound {
                quest_id: quest_id.to_string(),
                objective_id: objective_id.to_string(),
            })?;
        objective.completed = !objective.completed;
        let completed = objective.completed;

        quest.touch(&actor, self.clock.now());
        self.write(&quest).await?;
        self.refresh().await?;
        Ok(completed)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let _actor = self.require_actor("delete quests")?;
        self.require(id)?;
        self.store.delete(Collection::Quests, id).await?;
        info!(quest_id = %id, "Quest deleted");
        self.refresh().await
    }
}

//! Combine and convert workflows.
//!
//! Both workflows resolve every source rumor up front and fail before any
//! write if one is missing. Once the new record is persisted, the sources
//! are updated one at a time in the order the ids were given; a failed source
//! update is recorded in the returned [`BatchReport`] and the loop moves on.

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use tracing::{info, instrument, warn};

use super::batch::{BatchReport, CombineOutcome, ConversionOutcome};
use super::error::{Result, RumorError};
use super::store::{rumor_id_for, RumorStore};
use super::types::{CombineOptions, Rumor, RumorNote, RumorSource, RumorStatus};
use crate::core::auth::Actor;
use crate::core::backend::{to_document, Collection};
use crate::core::quests::QuestDraft;

/// Minimum number of distinct rumors for a combine.
pub const MIN_COMBINE_SOURCES: usize = 2;

/// Source name given to combined rumors unless overridden.
pub const COMBINED_SOURCE_NAME: &str = "Combined rumors";

impl RumorStore {
    /// Merge two or more rumors into a new one.
    ///
    /// Sources are marked confirmed and annotated with the new rumor's id.
    #[instrument(skip(self, options))]
    pub async fn combine(&self, ids: &[String], options: CombineOptions) -> Result<CombineOutcome> {
        let actor = self.require_actor("combine rumors")?;
        let ids = distinct(ids);
        if ids.len() < MIN_COMBINE_SOURCES {
            return Err(RumorError::NotEnoughRumors {
                required: MIN_COMBINE_SOURCES,
                found: ids.len(),
            });
        }
        let sources = self.resolve(&ids)?;
        let now = self.clock.now();

        let title = options
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| combined_title(now));
        let rumor_id = rumor_id_for(&title);
        if ids.contains(&rumor_id) {
            warn!(rumor_id = %rumor_id, "Combined title matches a source rumor");
            return Err(RumorError::IdCollision(rumor_id));
        }
        let content = options
            .content
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| combined_content(&sources));

        let merged = Rumor {
            id: rumor_id.clone(),
            title,
            content,
            status: options.status.unwrap_or(RumorStatus::Unconfirmed),
            source: options
                .source
                .unwrap_or_else(|| RumorSource::other(COMBINED_SOURCE_NAME)),
            location: options
                .location
                .or_else(|| sources.iter().find_map(|r| r.location.clone())),
            related_npcs: union(sources.iter().map(|r| &r.related_npcs)),
            related_locations: union(sources.iter().map(|r| &r.related_locations)),
            notes: vec![RumorNote::system(
                &actor,
                format!("Combined from rumors: {}", ids.join(", ")),
                now,
            )],
            converted_to_quest_id: None,
            date_added: now,
            date_modified: now,
            created_by: actor.uid.clone(),
            created_by_name: actor.label(),
            modified_by: actor.uid.clone(),
            modified_by_name: actor.label(),
        };

        self.store
            .set(Collection::Rumors, &rumor_id, to_document(&merged)?)
            .await?;
        info!(rumor_id = %rumor_id, sources = ids.len(), "Combined rumors");

        let note = format!("Combined into rumor: {rumor_id}");
        let report = self
            .update_sources(sources, &actor, now, &["status", "notes"], |rumor| {
                rumor.status = RumorStatus::Confirmed;
                note.clone()
            })
            .await;

        self.refresh().await?;
        Ok(CombineOutcome {
            rumor_id,
            sources: report,
        })
    }

    /// Derive a quest from one or more rumors.
    ///
    /// The quest is written straight to the `quests` collection; each source
    /// rumor gets a back-reference to it.
    #[instrument(skip(self, draft))]
    pub async fn convert_to_quest(&self, ids: &[String], draft: QuestDraft) -> Result<ConversionOutcome> {
        let actor = self.require_actor("convert rumors to quests")?;
        let ids = distinct(ids);
        if ids.is_empty() {
            return Err(RumorError::NotEnoughRumors {
                required: 1,
                found: 0,
            });
        }
        let sources = self.resolve(&ids)?;
        let now = self.clock.now();

        let mut draft = draft;
        if draft.related_npcs.is_empty() {
            draft.related_npcs = union(sources.iter().map(|r| &r.related_npcs));
        }
        if draft.location.is_none() {
            draft.location = sources.iter().find_map(|r| r.location.clone());
        }

        let quest_id = draft.quest_id();
        let mut quest = draft.build(quest_id.clone(), &actor, now);
        quest.source_rumors = ids.clone();

        self.store
            .set(Collection::Quests, &quest_id, to_document(&quest)?)
            .await?;
        info!(quest_id = %quest_id, sources = ids.len(), "Converted rumors to quest");

        let note = format!("Converted to quest: {quest_id}");
        let report = self
            .update_sources(sources, &actor, now, &["convertedToQuestId", "notes"], |rumor| {
                rumor.converted_to_quest_id = Some(quest_id.clone());
                note.clone()
            })
            .await;

        self.refresh().await?;
        Ok(ConversionOutcome {
            quest_id,
            sources: report,
        })
    }

    /// Resolve every id against the snapshot, failing on the first miss.
    fn resolve(&self, ids: &[String]) -> Result<Vec<Rumor>> {
        ids.iter().map(|id| self.require(id)).collect()
    }

    /// Apply `mutate` to each source, append the note it returns, and write
    /// `fields` back one rumor at a time.
    async fn update_sources<F>(
        &self,
        sources: Vec<Rumor>,
        actor: &Actor,
        now: DateTime<Utc>,
        fields: &[&str],
        mut mutate: F,
    ) -> BatchReport
    where
        F: FnMut(&mut Rumor) -> String,
    {
        let mut report = BatchReport::new();
        for mut rumor in sources {
            let note = mutate(&mut rumor);
            rumor.notes.push(RumorNote::system(actor, note, now));
            rumor.touch(actor, now);

            match self.patch(&rumor, fields).await {
                Ok(()) => report.record_success(&rumor.id),
                Err(e) => {
                    warn!(rumor_id = %rumor.id, error = %e, "Failed to update source rumor");
                    report.record_failure(&rumor.id, e);
                }
            }
        }
        report
    }
}

/// Ids with duplicates removed, first occurrence kept.
fn distinct(ids: &[String]) -> Vec<String> {
    ids.iter().cloned().collect::<IndexSet<_>>().into_iter().collect()
}

/// Deduplicated union of reference lists, in first-seen order.
fn union<'a>(lists: impl Iterator<Item = &'a Vec<String>>) -> Vec<String> {
    lists
        .flatten()
        .cloned()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Default title for a combined rumor, e.g. `Combined Rumor (1/2/2024)`.
pub fn combined_title(now: DateTime<Utc>) -> String {
    format!("Combined Rumor ({})", now.format("%-m/%-d/%Y"))
}

/// Each source as `"{title} (from {source}): {content}"`, blank-line separated.
pub fn combined_content(sources: &[Rumor]) -> String {
    sources
        .iter()
        .map(|r| format!("{} (from {}): {}", r.title, r.source.name(), r.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

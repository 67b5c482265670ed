//! Quest records and drafts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::auth::Actor;
use crate::core::slug::slugify_non_empty;

/// Title given to quests created without one.
pub const UNTITLED_QUEST: &str = "Untitled Quest";

/// Quest status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Active,
    Completed,
    Failed,
}

impl QuestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::Active => "active",
            QuestStatus::Completed => "completed",
            QuestStatus::Failed => "failed",
        }
    }
}

impl Default for QuestStatus {
    fn default() -> Self {
        QuestStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestObjective {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl QuestObjective {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            completed: false,
        }
    }
}

/// A named place or person with an optional blurb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl QuestReference {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// A persisted quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: QuestStatus,
    #[serde(default)]
    pub objectives: Vec<QuestObjective>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default)]
    pub leads: Vec<String>,
    #[serde(default)]
    pub key_locations: Vec<QuestReference>,
    #[serde(default, rename = "importantNPCs")]
    pub important_npcs: Vec<QuestReference>,
    #[serde(default, rename = "relatedNPCs")]
    pub related_npcs: Vec<String>,
    #[serde(default)]
    pub complications: Vec<String>,
    #[serde(default)]
    pub rewards: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_range: Option<String>,
    /// Rumors this quest was derived from.
    #[serde(default)]
    pub source_rumors: Vec<String>,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub created_by: String,
    pub created_by_name: String,
    pub modified_by: String,
    pub modified_by_name: String,
}

impl Quest {
    pub fn touch(&mut self, actor: &Actor, now: DateTime<Utc>) {
        self.date_modified = now.max(self.date_added);
        self.modified_by = actor.uid.clone();
        self.modified_by_name = actor.label();
    }

    /// Fraction of objectives completed, or `None` without objectives.
    pub fn progress(&self) -> Option<f32> {
        if self.objectives.is_empty() {
            return None;
        }
        let done = self.objectives.iter().filter(|o| o.completed).count();
        Some(done as f32 / self.objectives.len() as f32)
    }
}

/// Caller-supplied quest fields, from a form or a rumor conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestDraft {
    pub title: Option<String>,
    pub description: String,
    pub status: QuestStatus,
    /// Objective descriptions; ids are assigned on build.
    pub objectives: Vec<String>,
    pub background: Option<String>,
    pub leads: Vec<String>,
    pub key_locations: Vec<QuestReference>,
    #[serde(rename = "importantNPCs")]
    pub important_npcs: Vec<QuestReference>,
    #[serde(rename = "relatedNPCs")]
    pub related_npcs: Vec<String>,
    pub complications: Vec<String>,
    pub rewards: Vec<String>,
    pub location: Option<String>,
    pub level_range: Option<String>,
}

impl QuestDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_objectives<I, S>(mut self, objectives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.objectives = objectives.into_iter().map(Into::into).collect();
        self
    }

    /// Id for the quest this draft builds: the title's slug, or a random
    /// UUID when there is no title to derive one from.
    pub fn quest_id(&self) -> String {
        self.title
            .as_deref()
            .and_then(slugify_non_empty)
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    pub fn build(self, id: String, actor: &Actor, now: DateTime<Utc>) -> Quest {
        Quest {
            id,
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNTITLED_QUEST.to_string()),
            description: self.description,
            status: self.status,
            objectives: self.objectives.into_iter().map(QuestObjective::new).collect(),
            background: self.background,
            leads: self.leads,
            key_locations: self.key_locations,
            important_npcs: self.important_npcs,
            related_npcs: self.related_npcs,
            complications: self.complications,
            rewards: self.rewards,
            location: self.location,
            level_range: self.level_range,
            source_rumors: Vec::new(),
            date_added: now,
            date_modified: now,
            created_by: actor.uid.clone(),
            created_by_name: actor.label(),
            modified_by: actor.uid.clone(),
            modified_by_name: actor.label(),
        }
    }
}

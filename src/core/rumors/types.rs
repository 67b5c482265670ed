//! Rumor records and their building blocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::auth::Actor;

// ============================================================================
// Status
// ============================================================================

/// Whether a rumor has turned out to be true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RumorStatus {
    Confirmed,
    Unconfirmed,
    False,
}

impl RumorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RumorStatus::Confirmed => "confirmed",
            RumorStatus::Unconfirmed => "unconfirmed",
            RumorStatus::False => "false",
        }
    }
}

impl Default for RumorStatus {
    fn default() -> Self {
        RumorStatus::Unconfirmed
    }
}

// ============================================================================
// Source
// ============================================================================

/// Where the party heard a rumor.
///
/// Only NPC-sourced rumors carry a reference to the NPC record; every other
/// kind is described by free text alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sourceType", rename_all = "snake_case")]
pub enum RumorSource {
    Npc {
        #[serde(rename = "sourceNpcId")]
        npc_id: String,
        #[serde(rename = "sourceName")]
        name: String,
    },
    Tavern {
        #[serde(rename = "sourceName")]
        name: String,
    },
    Notice {
        #[serde(rename = "sourceName")]
        name: String,
    },
    Traveler {
        #[serde(rename = "sourceName")]
        name: String,
    },
    Other {
        #[serde(rename = "sourceName")]
        name: String,
    },
}

impl RumorSource {
    pub fn npc(npc_id: impl Into<String>, name: impl Into<String>) -> Self {
        RumorSource::Npc {
            npc_id: npc_id.into(),
            name: name.into(),
        }
    }

    pub fn tavern(name: impl Into<String>) -> Self {
        RumorSource::Tavern { name: name.into() }
    }

    pub fn notice(name: impl Into<String>) -> Self {
        RumorSource::Notice { name: name.into() }
    }

    pub fn traveler(name: impl Into<String>) -> Self {
        RumorSource::Traveler { name: name.into() }
    }

    pub fn other(name: impl Into<String>) -> Self {
        RumorSource::Other { name: name.into() }
    }

    /// Display name of the source, used when rumors are combined.
    pub fn name(&self) -> &str {
        match self {
            RumorSource::Npc { name, .. }
            | RumorSource::Tavern { name }
            | RumorSource::Notice { name }
            | RumorSource::Traveler { name }
            | RumorSource::Other { name } => name,
        }
    }

    pub fn npc_id(&self) -> Option<&str> {
        match self {
            RumorSource::Npc { npc_id, .. } => Some(npc_id),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RumorSource::Npc { .. } => "npc",
            RumorSource::Tavern { .. } => "tavern",
            RumorSource::Notice { .. } => "notice",
            RumorSource::Traveler { .. } => "traveler",
            RumorSource::Other { .. } => "other",
        }
    }
}

// ============================================================================
// Notes
// ============================================================================

/// A dated note attached to a rumor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RumorNote {
    pub id: String,
    pub content: String,
    pub added_by: String,
    pub added_by_name: String,
    pub date_added: DateTime<Utc>,
    /// Written by a workflow (combine, convert) rather than typed by a user.
    #[serde(default)]
    pub system: bool,
}

impl RumorNote {
    pub fn by(actor: &Actor, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            added_by: actor.uid.clone(),
            added_by_name: actor.label(),
            date_added: at,
            system: false,
        }
    }

    pub fn system(actor: &Actor, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            system: true,
            ..Self::by(actor, content, at)
        }
    }
}

// ============================================================================
// Rumor
// ============================================================================

/// A persisted rumor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rumor {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: RumorStatus,
    #[serde(flatten)]
    pub source: RumorSource,
    /// Location where the rumor was heard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, rename = "relatedNPCs")]
    pub related_npcs: Vec<String>,
    #[serde(default)]
    pub related_locations: Vec<String>,
    #[serde(default)]
    pub notes: Vec<RumorNote>,
    /// Set once the rumor has been turned into a quest; the rumor stays
    /// readable as history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_to_quest_id: Option<String>,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub created_by: String,
    pub created_by_name: String,
    pub modified_by: String,
    pub modified_by_name: String,
}

impl Rumor {
    pub fn is_converted(&self) -> bool {
        self.converted_to_quest_id.is_some()
    }

    /// Whether the rumor mentions `npc_id` as its source or as a related NPC.
    pub fn involves_npc(&self, npc_id: &str) -> bool {
        self.source.npc_id() == Some(npc_id) || self.related_npcs.iter().any(|n| n == npc_id)
    }

    /// Whether the rumor was heard at, or relates to, `location_id`.
    pub fn involves_location(&self, location_id: &str) -> bool {
        self.location.as_deref() == Some(location_id)
            || self.related_locations.iter().any(|l| l == location_id)
    }

    /// Stamp modifier identity and time.
    ///
    /// The modification time never precedes `date_added`.
    pub fn touch(&mut self, actor: &Actor, now: DateTime<Utc>) {
        self.date_modified = now.max(self.date_added);
        self.modified_by = actor.uid.clone();
        self.modified_by_name = actor.label();
    }
}

/// Caller-supplied fields for a new rumor.
///
/// Identity, timestamps, and authorship are filled in by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRumor {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: RumorStatus,
    #[serde(flatten)]
    pub source: RumorSource,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "relatedNPCs")]
    pub related_npcs: Option<Vec<String>>,
    #[serde(default)]
    pub related_locations: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<Vec<RumorNote>>,
}

impl NewRumor {
    pub fn new(title: impl Into<String>, content: impl Into<String>, source: RumorSource) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            status: RumorStatus::Unconfirmed,
            source,
            location: None,
            related_npcs: None,
            related_locations: None,
            notes: None,
        }
    }

    pub fn with_status(mut self, status: RumorStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_related_npcs<I, S>(mut self, npcs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_npcs = Some(npcs.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_related_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_locations = Some(locations.into_iter().map(Into::into).collect());
        self
    }

    /// Materialize the record, with absent lists coerced to empty ones.
    pub fn into_rumor(self, id: String, actor: &Actor, now: DateTime<Utc>) -> Rumor {
        Rumor {
            id,
            title: self.title,
            content: self.content,
            status: self.status,
            source: self.source,
            location: self.location,
            related_npcs: self.related_npcs.unwrap_or_default(),
            related_locations: self.related_locations.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            converted_to_quest_id: None,
            date_added: now,
            date_modified: now,
            created_by: actor.uid.clone(),
            created_by_name: actor.label(),
            modified_by: actor.uid.clone(),
            modified_by_name: actor.label(),
        }
    }
}

/// Caller overrides for [`RumorStore::combine`](super::RumorStore::combine).
///
/// Any field left `None` falls back to a value derived from the sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombineOptions {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<RumorStatus>,
    pub source: Option<RumorSource>,
    pub location: Option<String>,
}

impl CombineOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

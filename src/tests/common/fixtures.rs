//! Test Fixtures
//!
//! Builders for stores, actors and sample rumors.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::core::auth::{Actor, AuthState};
use crate::core::backend::{DocumentStore, MemoryDocumentStore};
use crate::core::clock::ManualClock;
use crate::core::quests::QuestStore;
use crate::core::rumors::{NewRumor, RumorSource, RumorStore};

// =============================================================================
// Actors and time
// =============================================================================

/// 2024-01-02 09:00 UTC.
pub fn fixed_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap()
}

pub fn game_master() -> Actor {
    Actor::new("gm-1")
        .with_display_name("Morgan")
        .with_email("morgan@example.com")
}

// =============================================================================
// Store Fixtures
// =============================================================================

/// Everything a workflow test needs, sharing one backend.
pub struct Campaign {
    pub backend: Arc<dyn DocumentStore>,
    pub auth: Arc<AuthState>,
    pub clock: Arc<ManualClock>,
    pub rumors: RumorStore,
    pub quests: QuestStore,
}

impl Campaign {
    /// Stores over `backend`, signed in as [`game_master`].
    pub fn over(backend: Arc<dyn DocumentStore>) -> Self {
        let auth = Arc::new(AuthState::signed_in(game_master()));
        let clock = Arc::new(ManualClock::new(fixed_start()));
        Self {
            rumors: RumorStore::new(backend.clone(), auth.clone(), clock.clone()),
            quests: QuestStore::new(backend.clone(), auth.clone(), clock.clone()),
            backend,
            auth,
            clock,
        }
    }

    pub fn in_memory() -> Self {
        Self::over(Arc::new(MemoryDocumentStore::new()))
    }
}

/// Three rumors about the same troubled harbor.
pub fn harbor_rumors() -> Vec<NewRumor> {
    vec![
        NewRumor::new(
            "Ghost Ship",
            "A ship with black sails drifts past the harbor at midnight.",
            RumorSource::tavern("The Salty Anchor"),
        )
        .with_location("loc-harbor")
        .with_related_npcs(["npc-harbormaster", "npc-old-tom"]),
        NewRumor::new(
            "Missing Sailors",
            "Three sailors vanished from the docks this week.",
            RumorSource::npc("npc-harbormaster", "Harbormaster Vell"),
        )
        .with_location("loc-docks")
        .with_related_npcs(["npc-old-tom", "npc-widow-ash"])
        .with_related_locations(["loc-harbor"]),
        NewRumor::new(
            "Cult Symbols",
            "Strange carvings appeared on the lighthouse door.",
            RumorSource::notice("Town board"),
        )
        .with_related_locations(["loc-lighthouse"]),
    ]
}

/// Add [`harbor_rumors`] and return their ids in order.
pub async fn seed_harbor(campaign: &Campaign) -> Vec<String> {
    let mut ids = Vec::new();
    for rumor in harbor_rumors() {
        ids.push(campaign.rumors.add(rumor).await.expect("Failed to seed rumor"));
    }
    ids
}

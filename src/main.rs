use std::sync::Arc;

use anyhow::Context;

use loremaster::config::AppConfig;
use loremaster::core::auth::AuthState;
use loremaster::core::backend::{Collection, JsonFileStore};
use loremaster::core::clock::SystemClock;
use loremaster::core::quests::{QuestStatus, QuestStore};
use loremaster::core::rumors::{RumorStatus, RumorStore};
use loremaster::core::session::{FileClientState, SessionStatus, SessionTracker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    let _log_guard = loremaster::core::logging::init(&config.logging, &config.log_dir());
    log::info!("{} v{} starting", loremaster::NAME, loremaster::VERSION);

    let data_dir = config.data_dir();
    let store = Arc::new(
        JsonFileStore::open(data_dir.join("collections"))
            .await
            .with_context(|| format!("opening data directory {}", data_dir.display()))?,
    );
    let auth = Arc::new(AuthState::new());
    let clock = Arc::new(SystemClock);

    let rumors = RumorStore::new(store.clone(), auth.clone(), clock.clone());
    let quests = QuestStore::new(store.clone(), auth.clone(), clock.clone());
    rumors.refresh().await.context("loading rumors")?;
    quests.refresh().await.context("loading quests")?;

    tracing::info!(
        collection = %Collection::Rumors,
        total = rumors.len(),
        confirmed = rumors.get_by_status(RumorStatus::Confirmed).len(),
        unconfirmed = rumors.get_by_status(RumorStatus::Unconfirmed).len(),
        false_rumors = rumors.get_by_status(RumorStatus::False).len(),
        active = rumors.active().len(),
        "Rumors loaded"
    );
    tracing::info!(
        collection = %Collection::Quests,
        total = quests.list().len(),
        active = quests.get_by_status(QuestStatus::Active).len(),
        completed = quests.get_by_status(QuestStatus::Completed).len(),
        failed = quests.get_by_status(QuestStatus::Failed).len(),
        "Quests loaded"
    );

    let tracker = SessionTracker::new(
        Arc::new(FileClientState::in_dir(&data_dir)),
        auth,
        clock,
        config.session.policy(),
    );
    match tracker.check().await {
        SessionStatus::NoSession => tracing::info!("No persisted session"),
        SessionStatus::Active => tracing::info!("Persisted session is active"),
        SessionStatus::Warning { kind, remaining } => tracing::warn!(
            ?kind,
            remaining_secs = remaining.num_seconds(),
            "Persisted session expires soon"
        ),
        SessionStatus::Expired { kind } => {
            tracing::info!(?kind, "Persisted session had expired and was cleared")
        }
    }

    Ok(())
}

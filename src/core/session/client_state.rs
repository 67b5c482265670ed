//! Client-local key/value state.
//!
//! Small pieces of per-device state (the session record, whether the privacy
//! notice has been shown) are kept as string values under fixed keys, the
//! way a browser keeps them in local storage.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::error::{Result, SessionError};
use super::record::SessionRecord;

/// Key holding the serialized [`SessionRecord`].
pub const SESSION_KEY: &str = "sessionInfo";

/// Key holding the privacy-notice acknowledgment flag.
pub const PRIVACY_NOTICE_KEY: &str = "privacyNoticeSeen";

/// String values under string keys.
#[cfg_attr(test, mockall::automock)]
pub trait ClientStateStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: String) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

// ============================================================================
// Implementations
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryClientState {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryClientState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStateStore for MemoryClientState {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// Client state persisted as one JSON object on disk.
#[derive(Debug)]
pub struct FileClientState {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileClientState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `client_state.json` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("client_state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(SessionError::Io(e)),
        }
    }

    fn write(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ClientStateStore for FileClientState {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read()?;
        values.insert(key.to_string(), value);
        self.write(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read()?;
        if values.remove(key).is_some() {
            self.write(&values)?;
        }
        Ok(())
    }
}

// ============================================================================
// Typed helpers
// ============================================================================

/// Read the session record.
///
/// A present but undecodable record is reported as
/// [`SessionError::Malformed`].
pub fn load_session(state: &dyn ClientStateStore) -> Result<Option<SessionRecord>> {
    match state.get(SESSION_KEY)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(SessionError::Malformed),
        None => Ok(None),
    }
}

pub fn save_session(state: &dyn ClientStateStore, record: &SessionRecord) -> Result<()> {
    state.set(SESSION_KEY, serde_json::to_string(record)?)
}

pub fn clear_session(state: &dyn ClientStateStore) -> Result<()> {
    debug!("Clearing persisted session record");
    state.remove(SESSION_KEY)
}

pub fn privacy_notice_seen(state: &dyn ClientStateStore) -> Result<bool> {
    Ok(state.get(PRIVACY_NOTICE_KEY)?.as_deref() == Some("true"))
}

pub fn mark_privacy_notice_seen(state: &dyn ClientStateStore) -> Result<()> {
    state.set(PRIVACY_NOTICE_KEY, "true".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::record::SessionPolicy;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_session_roundtrip() {
        let state = MemoryClientState::new();
        assert!(load_session(&state).unwrap().is_none());

        let record = SessionRecord::start(Utc::now(), true, &SessionPolicy::default());
        save_session(&state, &record).unwrap();
        let loaded = load_session(&state).unwrap().unwrap();
        // Millisecond precision on the wire.
        assert_eq!(loaded.created_at.timestamp_millis(), record.created_at.timestamp_millis());
        assert!(loaded.remember_me);

        clear_session(&state).unwrap();
        assert!(load_session(&state).unwrap().is_none());
    }

    #[test]
    fn test_malformed_session_is_reported() {
        let state = MemoryClientState::new();
        state.set(SESSION_KEY, "{\"createdAt\": \"yesterday\"}".to_string()).unwrap();
        let err = load_session(&state).unwrap_err();
        assert!(matches!(err, SessionError::Malformed(_)));
    }

    #[test]
    fn test_privacy_notice_flag() {
        let state = MemoryClientState::new();
        assert!(!privacy_notice_seen(&state).unwrap());
        mark_privacy_notice_seen(&state).unwrap();
        assert!(privacy_notice_seen(&state).unwrap());
    }

    #[test]
    fn test_file_state_persists() {
        let temp = TempDir::new().unwrap();
        let state = FileClientState::in_dir(temp.path());
        mark_privacy_notice_seen(&state).unwrap();

        let reopened = FileClientState::in_dir(temp.path());
        assert!(privacy_notice_seen(&reopened).unwrap());

        reopened.remove(PRIVACY_NOTICE_KEY).unwrap();
        assert!(!privacy_notice_seen(&state).unwrap());
    }
}

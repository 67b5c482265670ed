//! Session tracking
//!
//! Client-side session lifetime: the persisted [`SessionRecord`], the
//! key/value [`ClientStateStore`] it lives in, and the [`SessionTracker`]
//! that signs the user out when the session runs out.

pub mod client_state;
pub mod error;
pub mod record;
pub mod tracker;

pub use client_state::{
    clear_session, load_session, mark_privacy_notice_seen, privacy_notice_seen, save_session,
    ClientStateStore, FileClientState, MemoryClientState, PRIVACY_NOTICE_KEY, SESSION_KEY,
};
pub use error::SessionError;
pub use record::{SessionPolicy, SessionRecord};
pub use tracker::{
    evaluate, ActivityThrottle, ExpiryKind, InteractionEvent, SessionStatus, SessionTracker,
    TrackerHandle,
};

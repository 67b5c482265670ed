//! Persisted session record and expiry policy.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Timing rules for a signed-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Idle time after which the session ends.
    pub inactivity_window: Duration,
    /// Absolute lifetime of a standard session.
    pub standard_duration: Duration,
    /// Absolute lifetime when "remember me" is selected.
    pub remember_me_duration: Duration,
    /// How close to either expiry a warning is raised.
    pub warning_threshold: Duration,
    /// How often the persisted record is re-checked.
    pub check_interval: std::time::Duration,
    /// Minimum spacing between persisted activity updates.
    pub activity_throttle: Duration,
}

impl SessionPolicy {
    pub fn lifetime(&self, remember_me: bool) -> Duration {
        if remember_me {
            self.remember_me_duration
        } else {
            self.standard_duration
        }
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            inactivity_window: Duration::minutes(30),
            standard_duration: Duration::hours(24),
            remember_me_duration: Duration::days(30),
            warning_threshold: Duration::minutes(5),
            check_interval: std::time::Duration::from_secs(30),
            activity_throttle: Duration::seconds(60),
        }
    }
}

/// Client-side record of the current session, stored under `sessionInfo`.
///
/// Timestamps are epoch milliseconds on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_activity_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub remember_me: bool,
}

impl SessionRecord {
    /// A fresh session starting at `now`.
    pub fn start(now: DateTime<Utc>, remember_me: bool, policy: &SessionPolicy) -> Self {
        Self {
            created_at: now,
            last_activity_at: now,
            expires_at: now + policy.lifetime(remember_me),
            remember_me,
        }
    }

    /// Record user activity. Never moves before `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity_at = now.max(self.created_at);
    }

    /// Re-issue the session from `now`, possibly with a new lifetime.
    pub fn renew(&mut self, now: DateTime<Utc>, remember_me: bool, policy: &SessionPolicy) {
        *self = Self::start(now, remember_me, policy);
    }

    pub fn inactivity_deadline(&self, policy: &SessionPolicy) -> DateTime<Utc> {
        self.last_activity_at + policy.inactivity_window
    }
}

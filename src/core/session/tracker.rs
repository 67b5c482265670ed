//! Session Activity Tracker
//!
//! Two deadlines race against every signed-in session:
//!
//! - **absolute**: `expiresAt`, fixed when the session starts and moved only
//!   by an explicit [`SessionTracker::renew`]
//! - **inactivity**: `lastActivityAt + inactivity_window`, pushed forward by
//!   user interaction (throttled) or [`SessionTracker::extend_activity`]
//!
//! A periodic check evaluates both. Inside the warning threshold a
//! [`SessionStatus::Warning`] is published for the UI; once either deadline
//! passes the session is cleared and the user is signed out. The warning
//! never delays that sign-out.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::client_state::{clear_session, load_session, save_session, ClientStateStore};
use super::error::{Result, SessionError};
use super::record::{SessionPolicy, SessionRecord};
use crate::core::auth::{SessionTerminator, SignOutReason};
use crate::core::clock::Clock;

// ============================================================================
// Status
// ============================================================================

/// Which deadline a warning or expiry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryKind {
    Absolute,
    Inactivity,
}

impl ExpiryKind {
    pub fn sign_out_reason(self) -> SignOutReason {
        match self {
            ExpiryKind::Absolute => SignOutReason::Expired,
            ExpiryKind::Inactivity => SignOutReason::Inactivity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No session record, or an unreadable one.
    NoSession,
    Active,
    /// Within the warning threshold of `kind`'s deadline.
    Warning { kind: ExpiryKind, remaining: Duration },
    Expired { kind: ExpiryKind },
}

impl SessionStatus {
    pub fn is_expired(&self) -> bool {
        matches!(self, SessionStatus::Expired { .. })
    }
}

/// Evaluate a session record at `now`.
///
/// The absolute deadline wins whenever it is inside the warning window, even
/// if the inactivity deadline is sooner.
pub fn evaluate(record: &SessionRecord, now: DateTime<Utc>, policy: &SessionPolicy) -> SessionStatus {
    let absolute_left = record.expires_at - now;
    let idle_left = record.inactivity_deadline(policy) - now;

    if absolute_left <= Duration::zero() {
        return SessionStatus::Expired {
            kind: ExpiryKind::Absolute,
        };
    }
    if idle_left <= Duration::zero() {
        return SessionStatus::Expired {
            kind: ExpiryKind::Inactivity,
        };
    }
    if absolute_left <= policy.warning_threshold {
        return SessionStatus::Warning {
            kind: ExpiryKind::Absolute,
            remaining: absolute_left,
        };
    }
    if idle_left <= policy.warning_threshold {
        return SessionStatus::Warning {
            kind: ExpiryKind::Inactivity,
            remaining: idle_left,
        };
    }
    SessionStatus::Active
}

// ============================================================================
// Activity
// ============================================================================

/// User interactions that count as activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionEvent {
    PointerDown,
    PointerMove,
    KeyDown,
    Scroll,
    TouchStart,
}

impl InteractionEvent {
    pub const ALL: [InteractionEvent; 5] = [
        InteractionEvent::PointerDown,
        InteractionEvent::PointerMove,
        InteractionEvent::KeyDown,
        InteractionEvent::Scroll,
        InteractionEvent::TouchStart,
    ];
}

/// Gate for persisted activity updates.
#[derive(Debug, Clone)]
pub struct ActivityThrottle {
    interval: Duration,
    last_recorded: Option<DateTime<Utc>>,
}

impl ActivityThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_recorded: None,
        }
    }

    /// Whether an update at `now` should be written. Admitting one starts a
    /// new interval.
    pub fn admit(&mut self, now: DateTime<Utc>) -> bool {
        let due = match self.last_recorded {
            Some(last) => now - last > self.interval,
            None => true,
        };
        if due {
            self.last_recorded = Some(now);
        }
        due
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.last_recorded = Some(now);
    }
}

// ============================================================================
// Tracker
// ============================================================================

pub struct SessionTracker {
    state: Arc<dyn ClientStateStore>,
    terminator: Arc<dyn SessionTerminator>,
    clock: Arc<dyn Clock>,
    policy: SessionPolicy,
    throttle: Mutex<ActivityThrottle>,
    status: watch::Sender<SessionStatus>,
}

impl SessionTracker {
    pub fn new(
        state: Arc<dyn ClientStateStore>,
        terminator: Arc<dyn SessionTerminator>,
        clock: Arc<dyn Clock>,
        policy: SessionPolicy,
    ) -> Self {
        let (status, _) = watch::channel(SessionStatus::NoSession);
        Self {
            state,
            terminator,
            clock,
            throttle: Mutex::new(ActivityThrottle::new(policy.activity_throttle)),
            policy,
            status,
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Receiver for every status the tracker evaluates.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Most recently published status.
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    fn publish(&self, status: SessionStatus) {
        self.status.send_replace(status);
    }

    /// Write a fresh session record on sign-in.
    pub fn begin_session(&self, remember_me: bool) -> Result<SessionRecord> {
        let now = self.clock.now();
        let record = SessionRecord::start(now, remember_me, &self.policy);
        save_session(self.state.as_ref(), &record)?;
        self.throttle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset(now);
        info!(remember_me, expires_at = %record.expires_at, "Session started");
        self.publish(SessionStatus::Active);
        Ok(record)
    }

    /// Remove the session record on sign-out.
    pub fn end_session(&self) -> Result<()> {
        clear_session(self.state.as_ref())?;
        self.publish(SessionStatus::NoSession);
        Ok(())
    }

    /// Note a user interaction. Returns whether `lastActivityAt` was written.
    ///
    /// Nothing is written when there is no session or it has already
    /// expired; the next [`check`](Self::check) signs the user out.
    pub fn record_activity(&self, event: InteractionEvent) -> Result<bool> {
        let now = self.clock.now();
        let Some(mut record) = load_session(self.state.as_ref())? else {
            return Ok(false);
        };
        if evaluate(&record, now, &self.policy).is_expired() {
            debug!(?event, "Ignoring activity on an expired session");
            return Ok(false);
        }

        let admitted = self
            .throttle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .admit(now);
        if !admitted {
            return Ok(false);
        }

        record.touch(now);
        save_session(self.state.as_ref(), &record)?;
        debug!(?event, "Recorded session activity");
        Ok(true)
    }

    /// Load the record for a user-initiated extension, refusing one whose
    /// deadline has already passed.
    fn live_record(&self, now: DateTime<Utc>) -> Result<SessionRecord> {
        let record = load_session(self.state.as_ref())?.ok_or(SessionError::NoSession)?;
        if evaluate(&record, now, &self.policy).is_expired() {
            return Err(SessionError::Expired);
        }
        Ok(record)
    }

    /// Resolve an inactivity warning: refresh `lastActivityAt` only.
    pub fn extend_activity(&self) -> Result<()> {
        let now = self.clock.now();
        let mut record = self.live_record(now)?;
        record.touch(now);
        save_session(self.state.as_ref(), &record)?;
        self.throttle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset(now);
        self.publish(evaluate(&record, now, &self.policy));
        Ok(())
    }

    /// Resolve an absolute-expiry warning by re-issuing the session.
    pub fn renew(&self, remember_me: bool) -> Result<SessionRecord> {
        let now = self.clock.now();
        let mut record = self.live_record(now)?;
        record.renew(now, remember_me, &self.policy);
        save_session(self.state.as_ref(), &record)?;
        info!(remember_me, expires_at = %record.expires_at, "Session renewed");
        self.publish(evaluate(&record, now, &self.policy));
        Ok(record)
    }

    /// Evaluate the persisted record, signing out if a deadline has passed.
    ///
    /// Never fails: an unreadable record skips this cycle, and errors while
    /// signing out are logged.
    pub async fn check(&self) -> SessionStatus {
        let record = match load_session(self.state.as_ref()) {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.publish(SessionStatus::NoSession);
                return SessionStatus::NoSession;
            }
            Err(e) => {
                warn!(error = %e, "Skipping session check");
                self.publish(SessionStatus::NoSession);
                return SessionStatus::NoSession;
            }
        };

        let status = evaluate(&record, self.clock.now(), &self.policy);
        if let SessionStatus::Expired { kind } = status {
            info!(?kind, "Session expired, signing out");
            if let Err(e) = clear_session(self.state.as_ref()) {
                error!(error = %e, "Failed to clear expired session record");
            }
            if let Err(e) = self.terminator.terminate(kind.sign_out_reason()).await {
                error!(error = %e, "Forced sign-out failed");
            }
        }

        self.publish(status);
        status
    }

    /// Run the tracker until shutdown or forced sign-out.
    ///
    /// Checks once immediately, then every `check_interval`; interaction
    /// events arriving on `events` are recorded as they come.
    pub fn spawn(self: Arc<Self>, mut events: mpsc::Receiver<InteractionEvent>) -> TrackerHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.policy.check_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        debug!("Session tracker shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        if self.check().await.is_expired() {
                            break;
                        }
                    }
                    Some(event) = events.recv() => {
                        if let Err(e) = self.record_activity(event) {
                            warn!(error = %e, "Failed to record session activity");
                        }
                    }
                }
            }
        });

        TrackerHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

/// Owner of a running tracker task.
///
/// Dropping the handle stops the task so no timer or listener outlives the
/// component that started it.
#[derive(Debug)]
pub struct TrackerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TrackerHandle {
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the task and wait for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.join_inner().await;
    }

    /// Wait for the task to end on its own (after a forced sign-out).
    pub async fn join(mut self) {
        self.join_inner().await;
    }

    async fn join_inner(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!(error = %e, "Session tracker task failed");
                }
            }
        }
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

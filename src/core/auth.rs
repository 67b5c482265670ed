//! Authenticated actor context
//!
//! Every mutating store operation stamps the acting user's identity onto the
//! record it writes. Stores read that identity through [`ActorProvider`];
//! the session tracker signs the user out through [`SessionTerminator`].

use std::fmt;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// The signed-in user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl Actor {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Name shown next to records this actor touched.
    ///
    /// Falls back to the email, then to "Unknown".
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// Why a session was forcibly ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutReason {
    /// No interaction within the inactivity window.
    Inactivity,
    /// The session's absolute lifetime ran out.
    Expired,
    /// The user asked to sign out.
    UserRequested,
}

impl fmt::Display for SignOutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignOutReason::Inactivity => "inactivity",
            SignOutReason::Expired => "session expired",
            SignOutReason::UserRequested => "user requested",
        };
        f.write_str(s)
    }
}

/// Exposes the current actor, if any.
pub trait ActorProvider: Send + Sync {
    fn current_actor(&self) -> Option<Actor>;
}

/// Side effect run when a session has to end.
#[async_trait]
pub trait SessionTerminator: Send + Sync {
    async fn terminate(&self, reason: SignOutReason) -> Result<(), String>;
}

/// In-process authentication state.
///
/// Holds the signed-in actor; implements both [`ActorProvider`] and
/// [`SessionTerminator`] so the stores and the session tracker can share one
/// instance.
#[derive(Debug, Default)]
pub struct AuthState {
    actor: RwLock<Option<Actor>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(actor: Actor) -> Self {
        Self {
            actor: RwLock::new(Some(actor)),
        }
    }

    pub fn sign_in(&self, actor: Actor) {
        info!(uid = %actor.uid, "Actor signed in");
        *self.actor.write().unwrap_or_else(PoisonError::into_inner) = Some(actor);
    }

    pub fn sign_out(&self) -> Option<Actor> {
        let previous = self
            .actor
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(actor) = &previous {
            info!(uid = %actor.uid, "Actor signed out");
        }
        previous
    }

    pub fn is_signed_in(&self) -> bool {
        self.actor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl ActorProvider for AuthState {
    fn current_actor(&self) -> Option<Actor> {
        self.actor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SessionTerminator for AuthState {
    async fn terminate(&self, reason: SignOutReason) -> Result<(), String> {
        info!(%reason, "Terminating session");
        self.sign_out();
        Ok(())
    }
}

//! Admin authorization gate.
//!
//! Combines the session store and role resolver into one tri-state answer and
//! owns the sign-in/sign-out transitions. Every session event bumps a
//! generation counter and resets the state to `Pending`; a resolution started
//! at generation *g* is committed only while the generation is still *g*.

mod aliases;

use std::sync::Arc;

use hearthware_core::{Principal, Session};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{RoleResolver, SessionStore, Subscription};

pub use aliases::AliasTable;

/// Resolutions attempted by [`AuthGate::authorization`] before giving up on
/// a session that keeps changing underneath it.
const MAX_RESOLVE_ATTEMPTS: usize = 3;

/// Authorization state of the admin area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Still resolving.
    Pending,
    /// Signed in as an admin.
    Authorized(Principal),
    /// No session, or the session lacks the admin role.
    Unauthorized,
}

impl AuthState {
    /// Returns whether the state grants admin access.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }

    /// Maps the state onto what a guarded route must do.
    #[must_use]
    pub fn route_decision(&self) -> RouteDecision {
        match self {
            Self::Pending => RouteDecision::ShowLoading,
            Self::Authorized(_) => RouteDecision::Render,
            Self::Unauthorized => RouteDecision::RedirectToLogin,
        }
    }
}

/// Route guard outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Show a loading indicator; do not redirect.
    ShowLoading,
    /// Send the visitor to the login surface.
    RedirectToLogin,
    /// Render the guarded content.
    Render,
}

/// Gate state plus the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    /// Bumped on every session transition.
    pub generation: u64,
    /// Current state.
    pub state: AuthState,
}

/// Sign-in failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Identity service rejection or transport failure, message verbatim.
    #[error("{0}")]
    Identity(String),

    /// Credentials were valid but the principal is not an admin.
    #[error("this account is not authorized to access the admin area")]
    NotAdmin,

    /// The session changed again before sign-in finished resolving.
    #[error("the session changed during sign-in; please try again")]
    Superseded,
}

/// Authorization gate for the admin area.
pub struct AuthGate {
    sessions: SessionStore,
    roles: RoleResolver,
    aliases: AliasTable,
    snapshot: Arc<watch::Sender<AuthSnapshot>>,
    _session_events: Subscription,
}

impl AuthGate {
    /// Creates a gate in the `Pending` state and subscribes it to session
    /// transitions.
    #[must_use]
    pub fn new(sessions: SessionStore, roles: RoleResolver, aliases: AliasTable) -> Self {
        let (sender, _) = watch::channel(AuthSnapshot {
            generation: 0,
            state: AuthState::Pending,
        });
        let snapshot = Arc::new(sender);

        let invalidated = Arc::clone(&snapshot);
        let session_events = sessions.subscribe(move |event| {
            invalidated.send_modify(|snapshot| {
                snapshot.generation = snapshot.generation.wrapping_add(1);
                snapshot.state = AuthState::Pending;
            });
            debug!(event = event.name(), "session changed; authorization pending");
        });

        Self {
            sessions,
            roles,
            aliases,
            snapshot,
            _session_events: session_events,
        }
    }

    /// Returns the current state without resolving.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.snapshot.borrow().state.clone()
    }

    /// Returns a receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.snapshot.subscribe()
    }

    /// Returns the session store the gate observes.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Returns a terminal state for the caller to act on.
    ///
    /// A pending or authorized state is re-resolved against the identity
    /// service, so a session revoked or expired elsewhere stops being
    /// authorized here. An unauthorized state with no cached session is
    /// returned as is. Can still return `Pending` if the session keeps
    /// changing while the resolution runs.
    pub async fn authorization(&self) -> AuthState {
        let mut state = self.state();
        if state == AuthState::Unauthorized && self.sessions.cached().is_none() {
            return state;
        }

        for _ in 0..MAX_RESOLVE_ATTEMPTS {
            state = self.refresh().await;
            if state != AuthState::Pending {
                return state;
            }
        }
        state
    }

    /// Resolves session and role now, whatever the current state.
    pub async fn refresh(&self) -> AuthState {
        let generation = self.snapshot.borrow().generation;

        let resolved = match self.sessions.current_session().await {
            None => AuthState::Unauthorized,
            Some(session) => {
                if self.roles.is_admin(session.principal()).await {
                    AuthState::Authorized(session.principal().clone())
                } else {
                    AuthState::Unauthorized
                }
            }
        };

        self.commit(generation, resolved)
    }

    fn commit(&self, generation: u64, resolved: AuthState) -> AuthState {
        let mut stale = false;
        self.snapshot.send_if_modified(|snapshot| {
            if snapshot.generation != generation {
                stale = true;
                return false;
            }
            if snapshot.state == resolved {
                return false;
            }
            snapshot.state = resolved.clone();
            true
        });

        if stale {
            debug!(generation, "discarding stale authorization result");
        }

        self.state()
    }

    fn force_unauthorized(&self) {
        self.snapshot.send_modify(|snapshot| {
            snapshot.generation = snapshot.generation.wrapping_add(1);
            snapshot.state = AuthState::Unauthorized;
        });
    }

    /// Signs in with an email or a known username alias.
    ///
    /// A principal without the admin role has its fresh session revoked
    /// before `NotAdmin` is returned.
    pub async fn sign_in(&self, identifier: &str, password: &str) -> Result<Session, AuthError> {
        let email = self.aliases.resolve(identifier);
        let session = self
            .sessions
            .sign_in_with_password(&email, password)
            .await
            .map_err(|error| AuthError::Identity(error.message().to_owned()))?;

        let generation = self.snapshot.borrow().generation;
        if !self.roles.is_admin(session.principal()).await {
            warn!(
                principal_id = %session.principal().id(),
                "non-admin sign-in rejected; revoking session"
            );
            self.sessions.revoke(&session).await;
            self.force_unauthorized();
            return Err(AuthError::NotAdmin);
        }

        let committed = self.commit(
            generation,
            AuthState::Authorized(session.principal().clone()),
        );
        if committed == AuthState::Authorized(session.principal().clone()) {
            info!(principal_id = %session.principal().id(), "admin signed in");
            return Ok(session);
        }

        match self.authorization().await {
            AuthState::Authorized(principal) if principal == *session.principal() => Ok(session),
            _ => Err(AuthError::Superseded),
        }
    }

    /// Signs out. Always ends in `Unauthorized`.
    pub async fn sign_out(&self) {
        self.sessions.sign_out().await;
        self.force_unauthorized();
        info!("admin signed out");
    }
}

/// Route guard bound to one gate.
#[derive(Clone)]
pub struct RouteGuard {
    gate: Arc<AuthGate>,
}

impl RouteGuard {
    /// Creates a guard over a shared gate.
    #[must_use]
    pub fn new(gate: Arc<AuthGate>) -> Self {
        Self { gate }
    }

    /// Decision from the current state, without resolving.
    #[must_use]
    pub fn current(&self) -> RouteDecision {
        self.gate.state().route_decision()
    }

    /// Resolves a pending state, then decides.
    pub async fn check(&self) -> RouteDecision {
        self.gate.authorization().await.route_decision()
    }
}

#[cfg(test)]
mod tests;

//! Single source of truth for the current authenticated principal.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use hearthware_core::{AppResult, Session};
use tracing::{debug, info, warn};

use crate::{AccessTokenSource, IdentityProvider, Listeners, Subscription};

/// Session transition reported to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A principal signed in.
    SignedIn(Session),
    /// The session ended (sign-out, revocation or expiry).
    SignedOut,
    /// The same principal received new token material.
    TokenRefreshed(Session),
}

impl SessionEvent {
    /// Returns the session carried by the event.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) | Self::TokenRefreshed(session) => Some(session),
            Self::SignedOut => None,
        }
    }

    /// Returns a stable name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SignedIn(_) => "signed_in",
            Self::SignedOut => "signed_out",
            Self::TokenRefreshed(_) => "token_refreshed",
        }
    }
}

/// Caches the current session and broadcasts transitions.
///
/// The store holds no role information; subscribers re-resolve roles
/// themselves on every event.
#[derive(Clone)]
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    current: Arc<RwLock<Option<Session>>>,
    listeners: Listeners<SessionEvent>,
}

impl SessionStore {
    /// Creates a store with no session.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            current: Arc::new(RwLock::new(None)),
            listeners: Listeners::new(),
        }
    }

    /// Returns the cached session without contacting the identity service.
    #[must_use]
    pub fn cached(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, session: Option<Session>) -> Option<Session> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, session)
    }

    /// Clears the cache only if it still holds `session`.
    fn clear_if_current(&self, session: &Session) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if current
            .as_ref()
            .is_some_and(|cached| cached.access_token() == session.access_token())
        {
            *current = None;
            return true;
        }
        false
    }

    /// Returns the validated current session.
    ///
    /// Expired sessions are refreshed when possible. Never fails: an
    /// unreachable identity service yields `None`.
    pub async fn current_session(&self) -> Option<Session> {
        let mut session = self.cached()?;

        if session.is_expired(Utc::now()) {
            session = self.refresh_expired(&session).await?;
        }

        match self.provider.fetch_principal(session.access_token()).await {
            Ok(Some(_)) => Some(session),
            Ok(None) => {
                info!(
                    principal_id = %session.principal().id(),
                    "identity service no longer recognises session"
                );
                if self.clear_if_current(&session) {
                    self.listeners.emit(&SessionEvent::SignedOut);
                }
                None
            }
            Err(error) => {
                warn!(error = %error, "identity service unreachable; treating as signed out");
                None
            }
        }
    }

    async fn refresh_expired(&self, session: &Session) -> Option<Session> {
        let refreshed = match session.refresh_token() {
            Some(refresh_token) => self
                .provider
                .refresh_session(refresh_token)
                .await
                .map_err(|error| {
                    warn!(error = %error, "failed to refresh expired session");
                })
                .ok(),
            None => None,
        };

        match refreshed {
            Some(refreshed) => {
                self.replace(Some(refreshed.clone()));
                self.listeners
                    .emit(&SessionEvent::TokenRefreshed(refreshed.clone()));
                Some(refreshed)
            }
            None => {
                if self.clear_if_current(session) {
                    self.listeners.emit(&SessionEvent::SignedOut);
                }
                None
            }
        }
    }

    /// Signs in through the identity service and caches the new session.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session> {
        let session = self.provider.sign_in_with_password(email, password).await?;
        self.replace(Some(session.clone()));
        debug!(principal_id = %session.principal().id(), "session established");
        self.listeners.emit(&SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    /// Ends the current session. Transport failures are logged, not returned.
    pub async fn sign_out(&self) {
        let Some(session) = self.replace(None) else {
            return;
        };

        if let Err(error) = self.provider.sign_out(session.access_token()).await {
            warn!(error = %error, "remote sign-out failed; local session cleared anyway");
        }
        self.listeners.emit(&SessionEvent::SignedOut);
    }

    /// Invalidates one specific session, leaving any newer session in place.
    pub async fn revoke(&self, session: &Session) {
        if let Err(error) = self.provider.sign_out(session.access_token()).await {
            warn!(error = %error, "remote revocation failed");
        }
        if self.clear_if_current(session) {
            self.listeners.emit(&SessionEvent::SignedOut);
        }
    }

    /// Applies a transition the identity service reported out of band.
    pub fn observe_remote_change(&self, session: Option<Session>) {
        let previous = self.replace(session.clone());
        let event = match (previous, session) {
            (None, None) => return,
            (Some(_), None) => SessionEvent::SignedOut,
            (Some(previous), Some(next)) if previous.principal() == next.principal() => {
                SessionEvent::TokenRefreshed(next)
            }
            (_, Some(next)) => SessionEvent::SignedIn(next),
        };

        self.listeners.emit(&event);
    }

    /// Registers a transition callback.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback)
    }
}

impl AccessTokenSource for SessionStore {
    fn access_token(&self) -> Option<String> {
        self.cached()
            .map(|session| session.access_token().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{Duration, Utc};
    use hearthware_core::{Principal, Session};

    use crate::test_support::FakeIdentityProvider;

    use super::{SessionEvent, SessionStore};

    fn store_with_account() -> (SessionStore, Arc<FakeIdentityProvider>) {
        let provider = Arc::new(FakeIdentityProvider::default().with_account(
            "ops@example.com",
            "secret-pass",
            "p-ops",
        ));
        (SessionStore::new(provider.clone()), provider)
    }

    fn recorder(store: &SessionStore) -> (Arc<Mutex<Vec<SessionEvent>>>, crate::Subscription) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let subscription = store.subscribe(move |event| {
            if let Ok(mut events) = sink.lock() {
                events.push(event.clone());
            }
        });
        (events, subscription)
    }

    #[tokio::test]
    async fn no_session_yields_none() {
        let (store, _) = store_with_account();
        assert!(store.current_session().await.is_none());
    }

    #[tokio::test]
    async fn sign_in_caches_and_notifies_every_subscriber() {
        let (store, _) = store_with_account();
        let (first, _first_guard) = recorder(&store);
        let (second, _second_guard) = recorder(&store);

        let session = store
            .sign_in_with_password("ops@example.com", "secret-pass")
            .await;
        assert!(session.is_ok());

        let current = store.current_session().await;
        assert_eq!(
            current.as_ref().map(|session| session.principal().id()),
            Some("p-ops")
        );
        for events in [first, second] {
            let events = events.lock().map(|events| events.clone()).unwrap_or_default();
            assert!(matches!(events.as_slice(), [SessionEvent::SignedIn(_)]));
        }
    }

    #[tokio::test]
    async fn rejected_credentials_keep_message() {
        let (store, _) = store_with_account();
        let result = store
            .sign_in_with_password("ops@example.com", "wrong")
            .await;

        assert!(matches!(
            result,
            Err(hearthware_core::AppError::Unauthorized(message)) if message == "Invalid login credentials"
        ));
        assert!(store.cached().is_none());
    }

    #[tokio::test]
    async fn unreachable_service_fails_closed_without_dropping_cache() {
        let (store, provider) = store_with_account();
        let signed_in = store
            .sign_in_with_password("ops@example.com", "secret-pass")
            .await;
        assert!(signed_in.is_ok());

        provider.set_unreachable(true);
        assert!(store.current_session().await.is_none());
        assert!(store.cached().is_some());

        provider.set_unreachable(false);
        assert!(store.current_session().await.is_some());
    }

    #[tokio::test]
    async fn revoked_token_clears_cache_and_emits_sign_out() {
        let (store, provider) = store_with_account();
        let signed_in = store
            .sign_in_with_password("ops@example.com", "secret-pass")
            .await;
        assert!(signed_in.is_ok());
        let (events, _guard) = recorder(&store);

        provider.revoke_all();
        assert!(store.current_session().await.is_none());
        assert!(store.cached().is_none());

        let events = events.lock().map(|events| events.clone()).unwrap_or_default();
        assert_eq!(events, vec![SessionEvent::SignedOut]);
    }

    #[tokio::test]
    async fn sign_out_survives_transport_failure() {
        let (store, provider) = store_with_account();
        let signed_in = store
            .sign_in_with_password("ops@example.com", "secret-pass")
            .await;
        assert!(signed_in.is_ok());

        provider.set_unreachable(true);
        store.sign_out().await;
        assert!(store.cached().is_none());
    }

    #[tokio::test]
    async fn expired_session_is_refreshed() {
        let (store, provider) = store_with_account();
        let signed_in = store
            .sign_in_with_password("ops@example.com", "secret-pass")
            .await
            .unwrap_or_else(|_| unreachable!());

        let expired = Session::new(
            signed_in.access_token(),
            signed_in.refresh_token().map(ToOwned::to_owned),
            signed_in.principal().clone(),
            Some(Utc::now() - Duration::seconds(5)),
        );
        store.observe_remote_change(Some(expired));
        let (events, _guard) = recorder(&store);

        let current = store.current_session().await;
        assert!(current.is_some());
        assert_ne!(
            current.as_ref().map(|session| session.access_token().to_owned()),
            Some(signed_in.access_token().to_owned())
        );
        assert_eq!(provider.live_token_count(), 1);

        let events = events.lock().map(|events| events.clone()).unwrap_or_default();
        assert!(matches!(events.as_slice(), [SessionEvent::TokenRefreshed(_)]));
    }

    #[tokio::test]
    async fn remote_change_classifies_transitions() {
        let (store, _) = store_with_account();
        let (events, _guard) = recorder(&store);
        let principal = Principal::new("p-1", None);

        store.observe_remote_change(Some(Session::new("a", None, principal.clone(), None)));
        store.observe_remote_change(Some(Session::new("b", None, principal, None)));
        store.observe_remote_change(None);
        store.observe_remote_change(None);

        let events = events.lock().map(|events| events.clone()).unwrap_or_default();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], SessionEvent::SignedIn(_)));
        assert!(matches!(events[1], SessionEvent::TokenRefreshed(_)));
        assert_eq!(events[2], SessionEvent::SignedOut);
    }
}

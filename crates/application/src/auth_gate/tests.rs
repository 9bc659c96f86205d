use std::sync::Arc;

use async_trait::async_trait;
use hearthware_core::AppResult;
use hearthware_domain::RoleAssignment;
use tokio::sync::Notify;

use crate::test_support::{FakeIdentityProvider, FakeRoleRepository};
use crate::{RoleRepository, RoleResolver, SessionStore};

use super::{AliasTable, AuthError, AuthGate, AuthState, RouteDecision, RouteGuard};

const ADMIN_EMAIL: &str = "owner@kitchenexports.example";
const STAFF_EMAIL: &str = "staff@kitchenexports.example";

fn provider() -> Arc<FakeIdentityProvider> {
    Arc::new(
        FakeIdentityProvider::default()
            .with_account(ADMIN_EMAIL, "owner-pass", "p-admin")
            .with_account(STAFF_EMAIL, "staff-pass", "p-staff"),
    )
}

fn gate_with(provider: Arc<FakeIdentityProvider>, roles: Arc<dyn RoleRepository>) -> AuthGate {
    AuthGate::new(
        SessionStore::new(provider),
        RoleResolver::new(roles),
        AliasTable::new().with_alias("admin", ADMIN_EMAIL),
    )
}

fn gate() -> (AuthGate, Arc<FakeIdentityProvider>) {
    let provider = provider();
    let roles = Arc::new(
        FakeRoleRepository::default()
            .with_role("p-admin", "admin")
            .with_role("p-staff", "editor"),
    );
    (gate_with(provider.clone(), roles), provider)
}

/// Role store that parks every lookup until released.
struct ParkedRoleRepository {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl RoleRepository for ParkedRoleRepository {
    async fn find_role_assignment(&self, principal_id: &str) -> AppResult<Option<RoleAssignment>> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(Some(RoleAssignment::new(principal_id, "admin")))
    }
}

#[tokio::test]
async fn starts_pending_and_resolves_to_unauthorized_without_session() {
    let (gate, _) = gate();
    assert_eq!(gate.state(), AuthState::Pending);
    assert_eq!(gate.authorization().await, AuthState::Unauthorized);
}

#[tokio::test]
async fn admin_sign_in_authorizes() {
    let (gate, _) = gate();
    let session = gate.sign_in(ADMIN_EMAIL, "owner-pass").await;
    assert!(session.is_ok());

    assert!(gate.state().is_authorized());
    assert!(gate.authorization().await.is_authorized());
}

#[tokio::test]
async fn alias_sign_in_uses_canonical_email() {
    let (gate, _) = gate();
    let session = gate
        .sign_in("Admin", "owner-pass")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(session.principal().email(), Some(ADMIN_EMAIL));
    assert!(gate.state().is_authorized());
}

#[tokio::test]
async fn non_admin_sign_in_leaves_no_session_behind() {
    let (gate, provider) = gate();
    let result = gate.sign_in(STAFF_EMAIL, "staff-pass").await;

    assert_eq!(result.err(), Some(AuthError::NotAdmin));
    assert_eq!(gate.state(), AuthState::Unauthorized);
    assert!(gate.sessions().cached().is_none());
    assert!(gate.sessions().current_session().await.is_none());
    assert_eq!(provider.live_token_count(), 0);
}

#[tokio::test]
async fn identity_rejection_is_returned_verbatim() {
    let (gate, _) = gate();
    let result = gate.sign_in(ADMIN_EMAIL, "nope").await;

    assert_eq!(
        result.err(),
        Some(AuthError::Identity("Invalid login credentials".to_owned()))
    );
    assert_eq!(gate.authorization().await, AuthState::Unauthorized);
}

#[tokio::test]
async fn session_events_reset_state_to_pending() {
    let (gate, _) = gate();
    let signed_in = gate.sign_in(ADMIN_EMAIL, "owner-pass").await;
    assert!(signed_in.is_ok());
    let before = gate.subscribe().borrow().generation;

    let session = gate.sessions().cached();
    gate.sessions().observe_remote_change(session);

    let snapshot = gate.subscribe().borrow().clone();
    assert_eq!(snapshot.state, AuthState::Pending);
    assert!(snapshot.generation > before);
    assert!(gate.authorization().await.is_authorized());
}

#[tokio::test]
async fn stale_resolution_is_discarded_after_sign_out() {
    let provider = provider();
    let roles = Arc::new(ParkedRoleRepository {
        entered: Notify::new(),
        release: Notify::new(),
    });
    let gate = gate_with(provider, roles.clone());

    let session = gate
        .sessions()
        .sign_in_with_password(ADMIN_EMAIL, "owner-pass")
        .await;
    assert!(session.is_ok());

    let (resolved, ()) = tokio::join!(gate.refresh(), async {
        roles.entered.notified().await;
        gate.sessions().observe_remote_change(None);
        roles.release.notify_one();
    });

    assert_eq!(resolved, AuthState::Pending);
    assert_eq!(gate.authorization().await, AuthState::Unauthorized);
}

#[tokio::test]
async fn sign_out_is_unauthorized_even_when_service_is_down() {
    let (gate, provider) = gate();
    let signed_in = gate.sign_in(ADMIN_EMAIL, "owner-pass").await;
    assert!(signed_in.is_ok());

    provider.set_unreachable(true);
    gate.sign_out().await;

    assert_eq!(gate.state(), AuthState::Unauthorized);
    assert!(gate.sessions().cached().is_none());
}

#[tokio::test]
async fn unreachable_service_fails_closed() {
    let (gate, provider) = gate();
    let signed_in = gate.sign_in(ADMIN_EMAIL, "owner-pass").await;
    assert!(signed_in.is_ok());

    provider.set_unreachable(true);
    assert_eq!(gate.refresh().await, AuthState::Unauthorized);
}

#[tokio::test]
async fn role_lookup_failure_admits_only_bootstrap_identity() {
    let provider = provider();
    let gate = AuthGate::new(
        SessionStore::new(provider),
        RoleResolver::new(Arc::new(FakeRoleRepository::failing()))
            .with_bootstrap_admin(ADMIN_EMAIL),
        AliasTable::new(),
    );

    assert_eq!(
        gate.sign_in(STAFF_EMAIL, "staff-pass").await.err(),
        Some(AuthError::NotAdmin)
    );
    assert!(gate.sign_in(ADMIN_EMAIL, "owner-pass").await.is_ok());
    assert!(gate.state().is_authorized());
}

#[tokio::test]
async fn route_guard_maps_states() {
    assert_eq!(AuthState::Pending.route_decision(), RouteDecision::ShowLoading);
    assert_eq!(
        AuthState::Unauthorized.route_decision(),
        RouteDecision::RedirectToLogin
    );

    let (gate, _) = gate();
    let guard = RouteGuard::new(Arc::new(gate));
    assert_eq!(guard.current(), RouteDecision::ShowLoading);
    assert_eq!(guard.check().await, RouteDecision::RedirectToLogin);
}

#[tokio::test]
async fn route_guard_renders_for_admin() {
    let (gate, _) = gate();
    let gate = Arc::new(gate);
    let signed_in = gate.sign_in("admin", "owner-pass").await;
    assert!(signed_in.is_ok());

    let guard = RouteGuard::new(Arc::clone(&gate));
    assert_eq!(guard.check().await, RouteDecision::Render);
}

#[tokio::test]
async fn session_revoked_elsewhere_loses_admin_access() {
    let (gate, provider) = gate();
    let gate = Arc::new(gate);
    let signed_in = gate.sign_in(ADMIN_EMAIL, "owner-pass").await;
    assert!(signed_in.is_ok());
    let guard = RouteGuard::new(Arc::clone(&gate));
    assert_eq!(guard.check().await, RouteDecision::Render);

    provider.revoke_all();

    assert_eq!(guard.check().await, RouteDecision::RedirectToLogin);
    assert_eq!(gate.state(), AuthState::Unauthorized);
    assert!(gate.sessions().cached().is_none());
}

#[tokio::test]
async fn authorization_recovers_once_service_is_back() {
    let (gate, provider) = gate();
    let signed_in = gate.sign_in(ADMIN_EMAIL, "owner-pass").await;
    assert!(signed_in.is_ok());

    provider.set_unreachable(true);
    assert_eq!(gate.authorization().await, AuthState::Unauthorized);
    assert!(gate.sessions().cached().is_some());

    provider.set_unreachable(false);
    assert!(gate.authorization().await.is_authorized());
}

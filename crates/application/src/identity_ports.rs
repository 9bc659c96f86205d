use async_trait::async_trait;
use hearthware_core::{AppResult, Principal, Session};
use hearthware_domain::RoleAssignment;

/// Port for the remote identity service.
///
/// Rejections (bad credentials, revoked refresh token) are returned as
/// `AppError::Unauthorized` carrying the service's own human-readable message.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges email and password for a new session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session>;

    /// Resolves the principal behind an access token, or `None` when the
    /// token is no longer valid.
    async fn fetch_principal(&self, access_token: &str) -> AppResult<Option<Principal>>;

    /// Exchanges a refresh token for a new session.
    async fn refresh_session(&self, refresh_token: &str) -> AppResult<Session>;

    /// Invalidates a session on the service.
    async fn sign_out(&self, access_token: &str) -> AppResult<()>;
}

/// Port for role assignment lookups in the remote profile store.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Finds the role row for one principal.
    async fn find_role_assignment(&self, principal_id: &str) -> AppResult<Option<RoleAssignment>>;
}

/// Source of the bearer token remote adapters forward on admin calls.
pub trait AccessTokenSource: Send + Sync {
    /// Returns the current access token, if signed in.
    fn access_token(&self) -> Option<String>;
}

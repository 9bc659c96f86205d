use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use hearthware_application::IdentityProvider;
use hearthware_core::{AppError, AppResult, Principal, Session};
use tokio::sync::RwLock;
use uuid::Uuid;

const SESSION_LIFETIME_MINUTES: i64 = 60;

#[derive(Debug)]
struct Account {
    password: String,
    principal: Principal,
}

#[derive(Debug, Default)]
struct Tokens {
    access: HashMap<String, Principal>,
    refresh: HashMap<String, (String, Principal)>,
}

/// Identity provider for local development and tests.
///
/// Passwords are compared in plain text; never point this at real accounts.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    tokens: RwLock<Tokens>,
}

impl InMemoryIdentityProvider {
    /// Creates a provider without accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account and returns its principal.
    pub async fn register(&self, email: &str, password: &str) -> AppResult<Principal> {
        let email = email.trim().to_lowercase();
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&email) {
            return Err(AppError::Conflict(format!(
                "account '{email}' already exists"
            )));
        }

        let principal = Principal::new(Uuid::new_v4().to_string(), Some(email.clone()));
        accounts.insert(
            email,
            Account {
                password: password.to_owned(),
                principal: principal.clone(),
            },
        );
        Ok(principal)
    }

    async fn issue(&self, principal: Principal) -> Session {
        let access_token = Uuid::new_v4().simple().to_string();
        let refresh_token = Uuid::new_v4().simple().to_string();

        let mut tokens = self.tokens.write().await;
        tokens
            .access
            .insert(access_token.clone(), principal.clone());
        tokens.refresh.insert(
            refresh_token.clone(),
            (access_token.clone(), principal.clone()),
        );

        Session::new(
            access_token,
            Some(refresh_token),
            principal,
            Some(Utc::now() + Duration::minutes(SESSION_LIFETIME_MINUTES)),
        )
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session> {
        let principal = {
            let accounts = self.accounts.read().await;
            match accounts.get(&email.trim().to_lowercase()) {
                Some(account) if account.password == password => account.principal.clone(),
                _ => {
                    return Err(AppError::Unauthorized(
                        "Invalid login credentials".to_owned(),
                    ));
                }
            }
        };

        Ok(self.issue(principal).await)
    }

    async fn fetch_principal(&self, access_token: &str) -> AppResult<Option<Principal>> {
        Ok(self.tokens.read().await.access.get(access_token).cloned())
    }

    async fn refresh_session(&self, refresh_token: &str) -> AppResult<Session> {
        let principal = {
            let mut tokens = self.tokens.write().await;
            let (access_token, principal) = tokens
                .refresh
                .remove(refresh_token)
                .ok_or_else(|| AppError::Unauthorized("Invalid Refresh Token".to_owned()))?;
            tokens.access.remove(&access_token);
            principal
        };

        Ok(self.issue(principal).await)
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let mut tokens = self.tokens.write().await;
        tokens.access.remove(access_token);
        tokens
            .refresh
            .retain(|_, (issued_for, _)| issued_for != access_token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hearthware_application::IdentityProvider;
    use hearthware_core::AppError;

    use super::InMemoryIdentityProvider;

    #[tokio::test]
    async fn sign_in_issues_recognised_token() {
        let provider = InMemoryIdentityProvider::new();
        let principal = provider.register("Owner@Example.com", "pass-1").await;
        assert!(principal.is_ok());

        let session = provider
            .sign_in_with_password("owner@example.com", "pass-1")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(session.expires_at().is_some());

        let fetched = provider.fetch_principal(session.access_token()).await;
        assert_eq!(fetched.ok().flatten(), principal.ok());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_with_service_message() {
        let provider = InMemoryIdentityProvider::new();
        assert!(provider.register("owner@example.com", "pass-1").await.is_ok());

        let result = provider
            .sign_in_with_password("owner@example.com", "nope")
            .await;
        assert!(matches!(
            result,
            Err(AppError::Unauthorized(message)) if message == "Invalid login credentials"
        ));
    }

    #[tokio::test]
    async fn refresh_rotates_tokens() {
        let provider = InMemoryIdentityProvider::new();
        assert!(provider.register("owner@example.com", "pass-1").await.is_ok());
        let session = provider
            .sign_in_with_password("owner@example.com", "pass-1")
            .await
            .unwrap_or_else(|_| unreachable!());
        let refresh_token = session.refresh_token().unwrap_or_default().to_owned();

        let refreshed = provider.refresh_session(&refresh_token).await;
        assert!(refreshed.is_ok());
        assert!(matches!(
            provider.fetch_principal(session.access_token()).await,
            Ok(None)
        ));
        assert!(provider.refresh_session(&refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn sign_out_invalidates_token() {
        let provider = InMemoryIdentityProvider::new();
        assert!(provider.register("owner@example.com", "pass-1").await.is_ok());
        let session = provider
            .sign_in_with_password("owner@example.com", "pass-1")
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(provider.sign_out(session.access_token()).await.is_ok());
        assert!(matches!(
            provider.fetch_principal(session.access_token()).await,
            Ok(None)
        ));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let provider = InMemoryIdentityProvider::new();
        assert!(provider.register("owner@example.com", "a").await.is_ok());
        assert!(matches!(
            provider.register("OWNER@example.com", "b").await,
            Err(AppError::Conflict(_))
        ));
    }
}

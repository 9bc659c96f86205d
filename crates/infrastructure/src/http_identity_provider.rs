//! Identity adapter for a GoTrue-compatible auth endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use hearthware_application::IdentityProvider;
use hearthware_core::{AppError, AppResult, Principal, Session};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::remote_service::{ErrorScope, decode_json, error_from_response};
use crate::RemoteService;

#[derive(Debug, Deserialize)]
struct UserBody {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserBody> for Principal {
    fn from(value: UserBody) -> Self {
        Principal::new(value.id, value.email.filter(|email| !email.is_empty()))
    }
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserBody,
}

impl TokenBody {
    fn into_session(self, issued_at: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .or_else(|| {
                self.expires_in
                    .map(|seconds| issued_at + Duration::seconds(seconds))
            });

        Session::new(
            self.access_token,
            self.refresh_token.filter(|token| !token.is_empty()),
            self.user.into(),
            expires_at,
        )
    }
}

/// HTTP implementation of the identity provider port.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    service: RemoteService,
}

impl HttpIdentityProvider {
    /// Creates an adapter over the hosted auth endpoint.
    #[must_use]
    pub fn new(service: RemoteService) -> Self {
        Self { service }
    }

    async fn exchange_token(
        &self,
        grant_type: &str,
        body: serde_json::Value,
        operation: &str,
    ) -> AppResult<Session> {
        let mut url = self.service.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);

        let issued_at = Utc::now();
        let response = self
            .service
            .send(
                self.service.request(Method::POST, url, None).json(&body),
                operation,
            )
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, operation, ErrorScope::TokenGrant).await);
        }

        let token: TokenBody = decode_json(response, operation).await?;
        Ok(token.into_session(issued_at))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session> {
        self.exchange_token(
            "password",
            serde_json::json!({ "email": email, "password": password }),
            "sign-in",
        )
        .await
    }

    async fn fetch_principal(&self, access_token: &str) -> AppResult<Option<Principal>> {
        let url = self.service.endpoint("auth/v1/user")?;
        let response = self
            .service
            .send(
                self.service.request(Method::GET, url, Some(access_token)),
                "user lookup",
            )
            .await?;

        match response.status() {
            status if status.is_success() => {
                let user: UserBody = decode_json(response, "user lookup").await?;
                Ok(Some(user.into()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                debug!(status = %response.status(), "access token rejected by auth endpoint");
                Ok(None)
            }
            _ => Err(error_from_response(response, "user lookup", ErrorScope::Resource).await),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> AppResult<Session> {
        self.exchange_token(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
            "token refresh",
        )
        .await
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let url = self.service.endpoint("auth/v1/logout")?;
        let response = self
            .service
            .send(
                self.service.request(Method::POST, url, Some(access_token)),
                "sign-out",
            )
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            // Already invalid on the server; nothing left to revoke.
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Ok(()),
            _ => Err(error_from_response(response, "sign-out", ErrorScope::Resource).await),
        }
    }
}

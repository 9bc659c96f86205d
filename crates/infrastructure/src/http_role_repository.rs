use std::sync::Arc;

use async_trait::async_trait;
use hearthware_application::{AccessTokenSource, RoleRepository};
use hearthware_core::AppResult;
use hearthware_domain::RoleAssignment;
use reqwest::Method;
use serde::Deserialize;

use crate::remote_service::{ErrorScope, decode_json, error_from_response};
use crate::RemoteService;

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    #[serde(default)]
    role: Option<String>,
}

/// Reads role assignments from the `profiles` table.
#[derive(Clone)]
pub struct HttpRoleRepository {
    service: RemoteService,
    tokens: Arc<dyn AccessTokenSource>,
}

impl HttpRoleRepository {
    /// Creates a repository that forwards the signed-in user's token.
    #[must_use]
    pub fn new(service: RemoteService, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self { service, tokens }
    }
}

#[async_trait]
impl RoleRepository for HttpRoleRepository {
    async fn find_role_assignment(&self, principal_id: &str) -> AppResult<Option<RoleAssignment>> {
        let mut url = self.service.endpoint("rest/v1/profiles")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{principal_id}"))
            .append_pair("select", "id,role");

        let token = self.tokens.access_token();
        let response = self
            .service
            .send(
                self.service.request(Method::GET, url, token.as_deref()),
                "role lookup",
            )
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response, "role lookup", ErrorScope::Resource).await);
        }

        let rows: Vec<ProfileRow> = decode_json(response, "role lookup").await?;
        Ok(rows.into_iter().next().and_then(|row| {
            row.role
                .map(|role| RoleAssignment::new(row.id, role))
        }))
    }
}

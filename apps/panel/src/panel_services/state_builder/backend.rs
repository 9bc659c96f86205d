use std::sync::Arc;

use hearthware_application::{AccessTokenSource, BlogRepository, RoleRepository, SessionStore};
use hearthware_core::AppError;
use hearthware_domain::ADMIN_ROLE;
use hearthware_infrastructure::{
    HttpBlogRepository, HttpIdentityProvider, HttpRoleRepository, InMemoryBlogRepository,
    InMemoryIdentityProvider, InMemoryRoleRepository, RemoteService,
};
use tracing::{info, warn};

use crate::panel_config::BackendConfig;

pub(super) struct BackendSet {
    pub(super) name: &'static str,
    pub(super) sessions: SessionStore,
    pub(super) roles: Arc<dyn RoleRepository>,
    pub(super) blogs: Arc<dyn BlogRepository>,
}

pub(super) async fn build_backend(config: &BackendConfig) -> Result<BackendSet, AppError> {
    match config {
        BackendConfig::Remote { url, anon_key } => build_remote_backend(url, anon_key),
        BackendConfig::Memory { dev_admin } => build_memory_backend(dev_admin.as_ref()).await,
    }
}

fn build_remote_backend(url: &str, anon_key: &str) -> Result<BackendSet, AppError> {
    let service = RemoteService::new(reqwest::Client::new(), url, anon_key)?;
    let sessions = SessionStore::new(Arc::new(HttpIdentityProvider::new(service.clone())));
    let tokens: Arc<dyn AccessTokenSource> = Arc::new(sessions.clone());

    info!(url = %url, "using remote identity and blog backend");
    Ok(BackendSet {
        name: "remote",
        roles: Arc::new(HttpRoleRepository::new(service.clone(), Arc::clone(&tokens))),
        blogs: Arc::new(HttpBlogRepository::new(service, tokens)),
        sessions,
    })
}

async fn build_memory_backend(
    dev_admin: Option<&(String, String)>,
) -> Result<BackendSet, AppError> {
    let identity = Arc::new(InMemoryIdentityProvider::new());
    let roles = Arc::new(InMemoryRoleRepository::new());

    match dev_admin {
        Some((email, password)) => {
            let principal = identity.register(email, password).await?;
            roles.assign(principal.id(), ADMIN_ROLE).await;
            info!(principal_id = %principal.id(), "seeded development admin account");
        }
        None => {
            warn!("in-memory backend has no accounts; set DEV_ADMIN_EMAIL and DEV_ADMIN_PASSWORD");
        }
    }

    Ok(BackendSet {
        name: "memory",
        sessions: SessionStore::new(identity),
        roles,
        blogs: Arc::new(InMemoryBlogRepository::new()),
    })
}

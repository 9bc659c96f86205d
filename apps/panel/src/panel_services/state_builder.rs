use std::sync::Arc;

use hearthware_application::{
    AuthGate, BlogService, ChangeHub, EnquiryInbox, KeyValueStore, LocalRepository,
    PreferencesStore, ProductCatalog, RoleResolver, RouteGuard, StorageSignal,
};
use hearthware_core::AppError;
use hearthware_domain::CollectionKey;
use hearthware_infrastructure::{
    FileKeyValueStore, InMemoryKeyValueStore, NoopStorageSignal, RedisStorageSignal,
};
use tracing::info;

use crate::panel_config::PanelConfig;
use crate::state::AppState;

mod backend;

/// Redis pub/sub channel carrying collection change announcements.
const STORAGE_SIGNAL_CHANNEL: &str = "hearthware:collections";

pub async fn build_app_state(config: &PanelConfig) -> Result<AppState, AppError> {
    let storage: Arc<dyn KeyValueStore> = match config.storage_dir.as_ref() {
        Some(root) => {
            info!(root = %root.display(), "using file-backed collection storage");
            Arc::new(FileKeyValueStore::open(root)?)
        }
        None => Arc::new(InMemoryKeyValueStore::new()),
    };

    let hub = Arc::new(ChangeHub::new());
    let signal: Arc<dyn StorageSignal> = match config.redis_url.as_deref() {
        Some(redis_url) => {
            let redis_signal = RedisStorageSignal::open(redis_url, STORAGE_SIGNAL_CHANNEL)?;
            // Runs for the lifetime of the process.
            let _listener = redis_signal.spawn_listener(Arc::clone(&hub));
            info!(origin = %redis_signal.origin(), "cross-process change signal enabled");
            Arc::new(redis_signal)
        }
        None => Arc::new(NoopStorageSignal),
    };

    let backend = backend::build_backend(&config.backend).await?;

    let mut roles = RoleResolver::new(backend.roles);
    if let Some(email) = config.bootstrap_admin_email.as_deref() {
        roles = roles.with_bootstrap_admin(email);
    }
    let gate = Arc::new(AuthGate::new(
        backend.sessions,
        roles,
        config.aliases.clone(),
    ));

    let products = LocalRepository::new(
        CollectionKey::Products,
        Arc::clone(&storage),
        Arc::clone(&hub),
        Arc::clone(&signal),
    );
    let enquiries = LocalRepository::new(
        CollectionKey::Enquiries,
        Arc::clone(&storage),
        Arc::clone(&hub),
        signal,
    );

    let products = ProductCatalog::new(products);
    let storefront = Arc::new(products.live_storefront());

    Ok(AppState {
        backend: backend.name,
        guard: RouteGuard::new(Arc::clone(&gate)),
        gate,
        products,
        storefront,
        enquiries: EnquiryInbox::new(enquiries),
        blogs: BlogService::new(backend.blogs),
        preferences: PreferencesStore::new(Arc::clone(&storage)),
        storage,
    })
}

use std::sync::Arc;

use hearthware_application::{
    AuthGate, BlogService, EnquiryInbox, KeyValueStore, LiveCollection, PreferencesStore,
    ProductCatalog, RouteGuard,
};
use hearthware_domain::Product;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Backend name reported by the health check.
    pub backend: &'static str,
    pub gate: Arc<AuthGate>,
    pub guard: RouteGuard,
    pub products: ProductCatalog,
    /// Active products, reloaded whenever the catalog changes here or in a peer.
    pub storefront: Arc<LiveCollection<Product>>,
    pub enquiries: EnquiryInbox,
    pub blogs: BlogService,
    pub preferences: PreferencesStore,
    pub storage: Arc<dyn KeyValueStore>,
}

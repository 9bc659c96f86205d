//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_gate;
mod blog_ports;
mod blog_service;
mod change_hub;
mod enquiry_inbox;
mod identity_ports;
mod listeners;
mod live_collection;
mod local_repository;
mod preferences_store;
mod product_catalog;
mod role_resolver;
mod session_store;
mod storage_ports;

#[cfg(test)]
mod test_support;

pub use auth_gate::{
    AliasTable, AuthError, AuthGate, AuthSnapshot, AuthState, RouteDecision, RouteGuard,
};
pub use blog_ports::BlogRepository;
pub use blog_service::BlogService;
pub use change_hub::{ChangeHub, ChangeOrigin, CollectionChanged, CollectionWatch};
pub use enquiry_inbox::{EnquiryInbox, EnquirySummary};
pub use identity_ports::{AccessTokenSource, IdentityProvider, RoleRepository};
pub use listeners::{Listeners, Subscription};
pub use live_collection::LiveCollection;
pub use local_repository::LocalRepository;
pub use preferences_store::PreferencesStore;
pub use product_catalog::{ProductCatalog, ProductSummary};
pub use role_resolver::RoleResolver;
pub use session_store::{SessionEvent, SessionStore};
pub use storage_ports::{KeyValueStore, StorageSignal};

//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod file_key_value_store;
mod http_blog_repository;
mod http_identity_provider;
mod http_role_repository;
mod in_memory_blog_repository;
mod in_memory_identity_provider;
mod in_memory_key_value_store;
mod in_memory_role_repository;
mod noop_storage_signal;
mod redis_storage_signal;
mod remote_service;

pub use file_key_value_store::FileKeyValueStore;
pub use http_blog_repository::HttpBlogRepository;
pub use http_identity_provider::HttpIdentityProvider;
pub use http_role_repository::HttpRoleRepository;
pub use in_memory_blog_repository::InMemoryBlogRepository;
pub use in_memory_identity_provider::InMemoryIdentityProvider;
pub use in_memory_key_value_store::InMemoryKeyValueStore;
pub use in_memory_role_repository::InMemoryRoleRepository;
pub use noop_storage_signal::NoopStorageSignal;
pub use redis_storage_signal::RedisStorageSignal;
pub use remote_service::RemoteService;

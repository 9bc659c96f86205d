pub mod auth;
pub mod blogs;
pub mod enquiries;
pub mod health;
pub mod preferences;
pub mod products;

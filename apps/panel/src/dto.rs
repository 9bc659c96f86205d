mod auth;
mod blogs;
mod catalog;
mod common;
mod enquiries;

pub use auth::{AuthLoginRequest, AuthLoginResponse, AuthStatusResponse};
pub use blogs::{BlogDraftRequest, BlogPostResponse, LegacyImportResponse};
pub use catalog::{
    CategoryQuery, ProductActivationRequest, ProductRequest, ProductResponse,
    ProductSummaryResponse,
};
pub use common::{GenericMessageResponse, HealthResponse, PreferencesPayload};
pub use enquiries::{
    EnquiryRequest, EnquiryResponse, EnquiryRespondRequest, EnquiryStatusQuery,
    EnquiryStatusRequest, EnquirySummaryResponse,
};

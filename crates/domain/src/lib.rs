//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod blog;
mod enquiry;
mod preferences;
mod product;
mod security;
mod storage;

pub use blog::{
    BlogDraft, BlogPost, GENERATED_EXCERPT_CHARS, LegacyBlogEntry, WORDS_PER_MINUTE, parse_tags,
    read_time_minutes,
};
pub use enquiry::{
    CONTACT_FORM_SOURCE, Enquiry, EnquiryPriority, EnquiryStatus, EnquirySubmission,
    PHONE_NOT_PROVIDED,
};
pub use preferences::DisplayPreferences;
pub use product::{Product, ProductInput};
pub use security::{ADMIN_ROLE, RoleAssignment};
pub use storage::CollectionKey;

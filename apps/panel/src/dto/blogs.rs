use hearthware_domain::{BlogDraft, BlogPost};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for blog create and update. Tags are comma separated.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/blog-draft-request.ts"
)]
pub struct BlogDraftRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: String,
    pub image: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl From<BlogDraftRequest> for BlogDraft {
    fn from(value: BlogDraftRequest) -> Self {
        Self {
            title: value.title.trim().to_owned(),
            content: value.content,
            excerpt: value.excerpt,
            author: value.author,
            category: value.category,
            tags: value.tags,
            image: value.image,
            published: value.published,
        }
    }
}

/// API representation of a blog post.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/blog-post-response.ts"
)]
pub struct BlogPostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub published: bool,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub read_time: u32,
    pub views: u64,
}

impl From<BlogPost> for BlogPostResponse {
    fn from(value: BlogPost) -> Self {
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            excerpt: value.excerpt,
            author: value.author,
            category: value.category,
            tags: value.tags,
            image: value.image,
            published: value.published,
            published_at: value.published_at.map(|at| at.to_rfc3339()),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
            read_time: value.read_time,
            views: value.views,
        }
    }
}

/// Result of the one-shot legacy blog import.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/legacy-import-response.ts"
)]
pub struct LegacyImportResponse {
    pub imported: usize,
}

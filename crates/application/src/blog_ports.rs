use async_trait::async_trait;
use hearthware_core::AppResult;
use hearthware_domain::BlogPost;

/// Port for the remote blog table.
///
/// Writes are subject to the remote service's own access policy; a rejected
/// write surfaces as `AppError::Forbidden` or `AppError::Unauthorized`.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Lists published posts, optionally restricted to one category.
    async fn list_published(&self, category: Option<&str>) -> AppResult<Vec<BlogPost>>;

    /// Lists every post, drafts included.
    async fn list_all(&self) -> AppResult<Vec<BlogPost>>;

    /// Finds one post by id.
    async fn find(&self, id: &str) -> AppResult<Option<BlogPost>>;

    /// Stores a new post and returns the stored row.
    async fn insert(&self, post: &BlogPost) -> AppResult<BlogPost>;

    /// Writes the editable columns of an existing post and returns the
    /// stored row. `id`, `created_at` and `views` are left as stored.
    async fn update(&self, post: &BlogPost) -> AppResult<BlogPost>;

    /// Deletes one post.
    async fn delete(&self, id: &str) -> AppResult<()>;

    /// Adds one to the view counter of a post.
    async fn increment_views(&self, id: &str) -> AppResult<()>;
}

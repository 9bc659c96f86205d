use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use hearthware_application::BlogRepository;
use hearthware_core::{AppError, AppResult};
use hearthware_domain::BlogPost;
use tokio::sync::RwLock;

/// Blog table held in memory.
#[derive(Debug, Default)]
pub struct InMemoryBlogRepository {
    posts: RwLock<HashMap<String, BlogPost>>,
}

impl InMemoryBlogRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn list_published(&self, category: Option<&str>) -> AppResult<Vec<BlogPost>> {
        let posts = self.posts.read().await;
        let mut values: Vec<BlogPost> = posts
            .values()
            .filter(|post| post.published)
            .filter(|post| category.is_none_or(|category| post.in_category(category)))
            .cloned()
            .collect();

        values.sort_by_key(|post| Reverse(post.published_at));
        Ok(values)
    }

    async fn list_all(&self) -> AppResult<Vec<BlogPost>> {
        let posts = self.posts.read().await;
        let mut values: Vec<BlogPost> = posts.values().cloned().collect();
        values.sort_by_key(|post| Reverse(post.updated_at));
        Ok(values)
    }

    async fn find(&self, id: &str) -> AppResult<Option<BlogPost>> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn insert(&self, post: &BlogPost) -> AppResult<BlogPost> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(AppError::Conflict(format!(
                "post '{}' already exists",
                post.id
            )));
        }

        posts.insert(post.id.clone(), post.clone());
        Ok(post.clone())
    }

    async fn update(&self, post: &BlogPost) -> AppResult<BlogPost> {
        let mut posts = self.posts.write().await;
        let stored = posts
            .get_mut(&post.id)
            .ok_or_else(|| AppError::NotFound(format!("post '{}' does not exist", post.id)))?;

        *stored = BlogPost {
            id: stored.id.clone(),
            created_at: stored.created_at,
            views: stored.views,
            ..post.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.posts
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("post '{id}' does not exist")))
    }

    async fn increment_views(&self, id: &str) -> AppResult<()> {
        let mut posts = self.posts.write().await;
        let post = posts
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("post '{id}' does not exist")))?;
        post.views = post.views.saturating_add(1);
        Ok(())
    }
}

//! Blog articles backed by the remote service.
//!
//! The remote table is the only source of truth for posts. The legacy local
//! `blogs` fixture is read once by [`BlogService::import_legacy_fixture`] and
//! then removed.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::Utc;
use hearthware_core::{AppError, AppResult};
use hearthware_domain::{BlogDraft, BlogPost, CollectionKey, LegacyBlogEntry};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{BlogRepository, KeyValueStore};

/// Public reads and admin writes for blog posts.
#[derive(Clone)]
pub struct BlogService {
    repository: Arc<dyn BlogRepository>,
}

impl BlogService {
    /// Creates a service over the remote blog repository.
    #[must_use]
    pub fn new(repository: Arc<dyn BlogRepository>) -> Self {
        Self { repository }
    }

    /// Published posts, newest publication first.
    ///
    /// Remote failures degrade to an empty list.
    pub async fn list_published(&self, category: Option<&str>) -> Vec<BlogPost> {
        let mut posts = match self.repository.list_published(category).await {
            Ok(posts) => posts,
            Err(error) => {
                warn!(error = %error, category = ?category, "failed to list published posts");
                return Vec::new();
            }
        };

        posts.retain(|post| {
            post.published && category.is_none_or(|category| post.in_category(category))
        });
        posts.sort_by_key(|post| Reverse(post.published_at.unwrap_or(post.created_at)));
        posts
    }

    /// One published post. Drafts, unknown ids and failures yield `None`.
    pub async fn find_published(&self, id: &str) -> Option<BlogPost> {
        match self.repository.find(id).await {
            Ok(post) => post.filter(|post| post.published),
            Err(error) => {
                warn!(error = %error, post_id = %id, "failed to load post");
                None
            }
        }
    }

    /// Every post for the admin list, most recently edited first.
    pub async fn list_all(&self) -> AppResult<Vec<BlogPost>> {
        let mut posts = self.repository.list_all().await?;
        posts.sort_by_key(|post| Reverse(post.updated_at));
        Ok(posts)
    }

    /// Creates a post from a draft.
    pub async fn create(&self, draft: BlogDraft) -> AppResult<BlogPost> {
        let post = BlogPost::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());
        let stored = self.repository.insert(&post).await?;
        info!(post_id = %stored.id, published = stored.published, "post created");
        Ok(stored)
    }

    /// Applies a draft to an existing post.
    pub async fn update(&self, id: &str, draft: BlogDraft) -> AppResult<BlogPost> {
        let mut post = self
            .repository
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post '{id}' does not exist")))?;

        post.apply_draft(draft, Utc::now());
        let stored = self.repository.update(&post).await?;
        info!(post_id = %id, published = stored.published, "post updated");
        Ok(stored)
    }

    /// Deletes a post.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.delete(id).await?;
        info!(post_id = %id, "post deleted");
        Ok(())
    }

    /// Counts one view. Failures are logged and ignored.
    pub async fn record_view(&self, id: &str) {
        if let Err(error) = self.repository.increment_views(id).await {
            warn!(error = %error, post_id = %id, "failed to record post view");
        }
    }

    /// Moves the legacy local blog fixture into the remote table.
    ///
    /// Returns the number of imported posts. The local key is removed only
    /// after every entry was stored. When an insert fails, the key is
    /// rewritten with the entries not yet stored, so a retry does not
    /// duplicate what already went through.
    pub async fn import_legacy_fixture(&self, store: &dyn KeyValueStore) -> AppResult<usize> {
        let key = CollectionKey::LegacyBlogs;
        let Some(raw) = store.get_item(key.as_str())? else {
            return Ok(0);
        };

        let entries: Vec<LegacyBlogEntry> = serde_json::from_str(&raw).map_err(|error| {
            AppError::Validation(format!("legacy blog fixture is malformed: {error}"))
        })?;

        let now = Utc::now();
        for (imported, entry) in entries.iter().enumerate() {
            let post = BlogPost::from_draft(Uuid::new_v4().to_string(), entry.clone().into(), now);
            if let Err(error) = self.repository.insert(&post).await {
                warn!(error = %error, imported, "legacy blog import stopped");
                if imported > 0 {
                    keep_remaining(store, key, &entries[imported..]);
                }
                return Err(error);
            }
        }

        store.remove_item(key.as_str())?;
        info!(imported = entries.len(), "legacy blog fixture imported");
        Ok(entries.len())
    }
}

fn keep_remaining(store: &dyn KeyValueStore, key: CollectionKey, remaining: &[LegacyBlogEntry]) {
    let written = serde_json::to_string(remaining)
        .map_err(|error| AppError::Internal(format!("failed to encode legacy blogs: {error}")))
        .and_then(|raw| store.set_item(key.as_str(), &raw));

    if let Err(error) = written {
        warn!(
            error = %error,
            remaining = remaining.len(),
            "failed to shrink legacy blog fixture; a retry may duplicate posts"
        );
    }
}

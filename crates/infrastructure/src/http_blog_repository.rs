use std::sync::Arc;

use async_trait::async_trait;
use hearthware_application::{AccessTokenSource, BlogRepository};
use chrono::{DateTime, Utc};
use hearthware_core::{AppError, AppResult};
use hearthware_domain::BlogPost;
use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::remote_service::{ErrorScope, decode_json, error_from_response};
use crate::RemoteService;

const BLOGS_PATH: &str = "rest/v1/blogs";

/// Editable columns of a post. The view counter only moves through its RPC,
/// so a PATCH never carries it.
#[derive(Debug, Serialize)]
struct BlogPostPatch<'a> {
    title: &'a str,
    content: &'a str,
    excerpt: &'a str,
    author: &'a str,
    category: &'a str,
    tags: &'a [String],
    image: Option<&'a str>,
    published: bool,
    published_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
    read_time: u32,
}

impl<'a> From<&'a BlogPost> for BlogPostPatch<'a> {
    fn from(post: &'a BlogPost) -> Self {
        Self {
            title: &post.title,
            content: &post.content,
            excerpt: &post.excerpt,
            author: &post.author,
            category: &post.category,
            tags: &post.tags,
            image: post.image.as_deref(),
            published: post.published,
            published_at: post.published_at,
            updated_at: post.updated_at,
            read_time: post.read_time,
        }
    }
}

/// PostgREST adapter for the `blogs` table.
///
/// Admin writes carry the signed-in user's token so the table's row level
/// policies decide whether they are allowed.
#[derive(Clone)]
pub struct HttpBlogRepository {
    service: RemoteService,
    tokens: Arc<dyn AccessTokenSource>,
}

impl HttpBlogRepository {
    /// Creates a repository over the hosted REST endpoint.
    #[must_use]
    pub fn new(service: RemoteService, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self { service, tokens }
    }

    fn table_url(&self) -> AppResult<Url> {
        self.service.endpoint(BLOGS_PATH)
    }

    async fn fetch_rows(&self, url: Url, operation: &str) -> AppResult<Vec<BlogPost>> {
        let token = self.tokens.access_token();
        let response = self
            .service
            .send(
                self.service.request(Method::GET, url, token.as_deref()),
                operation,
            )
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response, operation, ErrorScope::Resource).await);
        }

        decode_json(response, operation).await
    }

    async fn write_row<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        post_id: &str,
        body: &B,
        operation: &str,
    ) -> AppResult<BlogPost> {
        let token = self.tokens.access_token();
        let response = self
            .service
            .send(
                self.service
                    .request(method, url, token.as_deref())
                    .header("Prefer", "return=representation")
                    .json(body),
                operation,
            )
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response, operation, ErrorScope::Resource).await);
        }

        // Row level security can silently filter the returned representation.
        let rows: Vec<BlogPost> = decode_json(response, operation).await?;
        rows.into_iter().next().ok_or_else(|| {
            AppError::Forbidden(format!("{operation} was not permitted for post '{post_id}'"))
        })
    }
}

fn filter_by_id(url: &mut Url, id: &str) {
    url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
}

#[async_trait]
impl BlogRepository for HttpBlogRepository {
    async fn list_published(&self, category: Option<&str>) -> AppResult<Vec<BlogPost>> {
        let mut url = self.table_url()?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("select", "*")
                .append_pair("published", "eq.true")
                .append_pair("order", "published_at.desc.nullslast");
            if let Some(category) = category {
                query.append_pair("category", &format!("ilike.{category}"));
            }
        }

        self.fetch_rows(url, "published post listing").await
    }

    async fn list_all(&self) -> AppResult<Vec<BlogPost>> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "updated_at.desc");

        self.fetch_rows(url, "post listing").await
    }

    async fn find(&self, id: &str) -> AppResult<Option<BlogPost>> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("select", "*");
        filter_by_id(&mut url, id);

        Ok(self
            .fetch_rows(url, "post lookup")
            .await?
            .into_iter()
            .next())
    }

    async fn insert(&self, post: &BlogPost) -> AppResult<BlogPost> {
        let url = self.table_url()?;
        self.write_row(Method::POST, url, &post.id, post, "post insert")
            .await
    }

    async fn update(&self, post: &BlogPost) -> AppResult<BlogPost> {
        let mut url = self.table_url()?;
        filter_by_id(&mut url, &post.id);
        let patch = BlogPostPatch::from(post);
        self.write_row(Method::PATCH, url, &post.id, &patch, "post update")
            .await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut url = self.table_url()?;
        filter_by_id(&mut url, id);

        let token = self.tokens.access_token();
        let response = self
            .service
            .send(
                self.service.request(Method::DELETE, url, token.as_deref()),
                "post delete",
            )
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response, "post delete", ErrorScope::Resource).await);
        }

        Ok(())
    }

    async fn increment_views(&self, id: &str) -> AppResult<()> {
        let url = self.service.endpoint("rest/v1/rpc/increment_blog_views")?;
        let token = self.tokens.access_token();
        let response = self
            .service
            .send(
                self.service
                    .request(Method::POST, url, token.as_deref())
                    .json(&serde_json::json!({ "blog_id": id })),
                "view counter",
            )
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response, "view counter", ErrorScope::Resource).await);
        }

        Ok(())
    }
}

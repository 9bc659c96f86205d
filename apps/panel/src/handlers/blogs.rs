use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use hearthware_core::AppError;
use hearthware_domain::BlogDraft;

use crate::dto::{BlogDraftRequest, BlogPostResponse, CategoryQuery, LegacyImportResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Published posts, newest first. An unreachable backend yields an empty list.
pub async fn list_published_blogs_handler(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Json<Vec<BlogPostResponse>> {
    let posts = state.blogs.list_published(query.category.as_deref()).await;
    Json(posts.into_iter().map(BlogPostResponse::from).collect())
}

pub async fn get_published_blog_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<BlogPostResponse>> {
    let post = state
        .blogs
        .find_published(post_id.as_str())
        .await
        .ok_or_else(|| AppError::NotFound(format!("post '{post_id}' does not exist")))?;

    state.blogs.record_view(post_id.as_str()).await;
    Ok(Json(BlogPostResponse::from(post)))
}

pub async fn list_blogs_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<BlogPostResponse>>> {
    let posts = state
        .blogs
        .list_all()
        .await?
        .into_iter()
        .map(BlogPostResponse::from)
        .collect();

    Ok(Json(posts))
}

pub async fn create_blog_handler(
    State(state): State<AppState>,
    Json(payload): Json<BlogDraftRequest>,
) -> ApiResult<(StatusCode, Json<BlogPostResponse>)> {
    let draft = BlogDraft::from(payload);
    draft.validate()?;
    let post = state.blogs.create(draft).await?;

    Ok((StatusCode::CREATED, Json(BlogPostResponse::from(post))))
}

pub async fn update_blog_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(payload): Json<BlogDraftRequest>,
) -> ApiResult<Json<BlogPostResponse>> {
    let draft = BlogDraft::from(payload);
    draft.validate()?;
    let post = state.blogs.update(post_id.as_str(), draft).await?;

    Ok(Json(BlogPostResponse::from(post)))
}

pub async fn delete_blog_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.blogs.delete(post_id.as_str()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn import_legacy_blogs_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<LegacyImportResponse>> {
    let imported = state
        .blogs
        .import_legacy_fixture(state.storage.as_ref())
        .await?;

    Ok(Json(LegacyImportResponse { imported }))
}

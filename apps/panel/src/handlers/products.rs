use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use hearthware_domain::ProductInput;

use crate::dto::{
    CategoryQuery, ProductActivationRequest, ProductRequest, ProductResponse,
    ProductSummaryResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Storefront listing: active products only.
pub async fn list_public_products_handler(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Json<Vec<ProductResponse>> {
    let products = state
        .storefront
        .snapshot()
        .into_iter()
        .filter(|product| {
            query
                .category
                .as_deref()
                .is_none_or(|category| product.in_category(category))
        })
        .map(ProductResponse::from)
        .collect();

    Json(products)
}

pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Json<Vec<ProductResponse>> {
    let products = match query.category.as_deref() {
        Some(category) => state.products.list_by_category(category),
        None => state.products.list_all(),
    };

    Json(products.into_iter().map(ProductResponse::from).collect())
}

pub async fn create_product_handler(
    State(state): State<AppState>,
    Json(payload): Json<ProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let input = ProductInput::from(payload);
    input.validate()?;
    let product = state.products.create(input)?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(payload): Json<ProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let input = ProductInput::from(payload);
    input.validate()?;
    let product = state.products.update(product_id.as_str(), input)?;

    Ok(Json(ProductResponse::from(product)))
}

pub async fn set_product_active_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(payload): Json<ProductActivationRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let product = state
        .products
        .set_active(product_id.as_str(), payload.active)?;

    Ok(Json(ProductResponse::from(product)))
}

pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.products.delete(product_id.as_str())?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn product_summary_handler(State(state): State<AppState>) -> Json<ProductSummaryResponse> {
    Json(ProductSummaryResponse::from(state.products.summary()))
}

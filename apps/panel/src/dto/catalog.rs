use std::collections::BTreeMap;

use hearthware_application::ProductSummary;
use hearthware_domain::{Product, ProductInput};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Optional category filter for product listings.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// Incoming payload for product create and update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-request.ts"
)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl From<ProductRequest> for ProductInput {
    fn from(value: ProductRequest) -> Self {
        Self {
            name: value.name.trim().to_owned(),
            description: value.description,
            price: value.price,
            category: value.category.trim().to_owned(),
            image: value.image,
            features: value
                .features
                .into_iter()
                .map(|feature| feature.trim().to_owned())
                .filter(|feature| !feature.is_empty())
                .collect(),
            specifications: value.specifications,
            stock: value.stock,
            active: value.active,
        }
    }
}

/// Incoming payload for showing or hiding a product.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-activation-request.ts"
)]
pub struct ProductActivationRequest {
    pub active: bool,
}

/// API representation of a product.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-response.ts"
)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    pub features: Vec<String>,
    pub specifications: BTreeMap<String, String>,
    pub stock: u32,
    pub active: bool,
    pub created_at: String,
}

impl From<Product> for ProductResponse {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            price: value.price,
            category: value.category,
            image: value.image,
            features: value.features,
            specifications: value.specifications,
            stock: value.stock,
            active: value.active,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Catalog dashboard counters.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-summary-response.ts"
)]
pub struct ProductSummaryResponse {
    pub total: usize,
    pub active: usize,
    pub out_of_stock: usize,
    pub categories: Vec<String>,
}

impl From<ProductSummary> for ProductSummaryResponse {
    fn from(value: ProductSummary) -> Self {
        Self {
            total: value.total,
            active: value.active,
            out_of_stock: value.out_of_stock,
            categories: value.categories,
        }
    }
}

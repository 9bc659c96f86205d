//! Product catalog entries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hearthware_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// A sellable catalog item as stored in the products collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier, unique within the collection.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Category label. Matched case-insensitively.
    pub category: String,
    /// Image reference (URL or asset path).
    #[serde(default)]
    pub image: String,
    /// Ordered feature bullet points.
    #[serde(default)]
    pub features: Vec<String>,
    /// Open-ended specification table.
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    /// Units in stock.
    #[serde(default)]
    pub stock: u32,
    /// Whether the product is shown on public pages.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// Builds a stored product from admin input.
    #[must_use]
    pub fn from_input(id: impl Into<String>, input: ProductInput, created_at: DateTime<Utc>) -> Self {
        let mut product = Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            price: 0.0,
            category: String::new(),
            image: String::new(),
            features: Vec::new(),
            specifications: BTreeMap::new(),
            stock: 0,
            active: true,
            created_at,
        };
        product.apply(input);
        product
    }

    /// Overwrites every editable attribute. Identity and creation time stay.
    pub fn apply(&mut self, input: ProductInput) {
        self.name = input.name;
        self.description = input.description;
        self.price = input.price;
        self.category = input.category;
        self.image = input.image;
        self.features = input.features;
        self.specifications = input.specifications;
        self.stock = input.stock;
        self.active = input.active;
    }

    /// Case-insensitive category equality.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}

/// Editable product attributes submitted by the admin form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Category label.
    pub category: String,
    /// Image reference.
    #[serde(default)]
    pub image: String,
    /// Ordered feature bullet points.
    #[serde(default)]
    pub features: Vec<String>,
    /// Specification table.
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    /// Units in stock.
    #[serde(default)]
    pub stock: u32,
    /// Visibility flag.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl ProductInput {
    /// Checks the form-level rules. Repositories do not call this.
    pub fn validate(&self) -> AppResult<()> {
        NonEmptyString::required(self.name.as_str(), "product name")?;
        NonEmptyString::required(self.category.as_str(), "product category")?;

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::Validation(
                "product price must be a non-negative number".to_owned(),
            ));
        }

        Ok(())
    }
}

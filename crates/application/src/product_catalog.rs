//! Product catalog over the local `products` collection.

use std::collections::BTreeSet;

use chrono::Utc;
use hearthware_core::{AppError, AppResult};
use hearthware_domain::{Product, ProductInput};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{LiveCollection, LocalRepository};

/// Dashboard counters for the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    /// Number of stored products.
    pub total: usize,
    /// Products visible on public pages.
    pub active: usize,
    /// Products with zero stock.
    pub out_of_stock: usize,
    /// Distinct category labels, sorted.
    pub categories: Vec<String>,
}

/// Admin and public operations on products.
///
/// Inputs are assumed validated by the caller.
#[derive(Clone)]
pub struct ProductCatalog {
    repository: LocalRepository<Product>,
}

impl ProductCatalog {
    /// Creates a catalog over the products repository.
    #[must_use]
    pub fn new(repository: LocalRepository<Product>) -> Self {
        Self { repository }
    }

    /// Returns every product in stored order.
    #[must_use]
    pub fn list_all(&self) -> Vec<Product> {
        self.repository.load_all()
    }

    /// Returns the products of one category, compared case-insensitively.
    #[must_use]
    pub fn list_by_category(&self, category: &str) -> Vec<Product> {
        self.repository
            .load_filtered(|product| product.in_category(category))
    }

    /// Same as [`Self::list_by_category`], hiding inactive products.
    #[must_use]
    pub fn list_active_by_category(&self, category: &str) -> Vec<Product> {
        self.repository
            .load_filtered(|product| product.active && product.in_category(category))
    }

    /// Finds one product.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<Product> {
        self.repository
            .load_all()
            .into_iter()
            .find(|product| product.id == id)
    }

    /// Appends a new product with a fresh identifier.
    pub fn create(&self, input: ProductInput) -> AppResult<Product> {
        let product = Product::from_input(Uuid::new_v4().to_string(), input, Utc::now());
        let created = product.clone();
        self.repository.update(move |products| {
            products.push(product);
            Ok(())
        })?;

        info!(product_id = %created.id, category = %created.category, "product created");
        Ok(created)
    }

    /// Overwrites the editable attributes of one product.
    pub fn update(&self, id: &str, input: ProductInput) -> AppResult<Product> {
        let updated = self.repository.update(|products| {
            let product = find_mut(products, id)?;
            product.apply(input);
            Ok(product.clone())
        })?;

        info!(product_id = %id, "product updated");
        Ok(updated)
    }

    /// Shows or hides one product on public pages.
    pub fn set_active(&self, id: &str, active: bool) -> AppResult<Product> {
        let updated = self.repository.update(|products| {
            let product = find_mut(products, id)?;
            product.active = active;
            Ok(product.clone())
        })?;

        info!(product_id = %id, active, "product visibility changed");
        Ok(updated)
    }

    /// Removes one product.
    pub fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.update(|products| {
            let before = products.len();
            products.retain(|product| product.id != id);
            if products.len() == before {
                return Err(not_found(id));
            }
            Ok(())
        })?;

        info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Computes dashboard counters.
    #[must_use]
    pub fn summary(&self) -> ProductSummary {
        let products = self.repository.load_all();
        let categories: BTreeSet<String> = products
            .iter()
            .map(|product| product.category.clone())
            .collect();

        ProductSummary {
            total: products.len(),
            active: products.iter().filter(|product| product.active).count(),
            out_of_stock: products.iter().filter(|product| product.stock == 0).count(),
            categories: categories.into_iter().collect(),
        }
    }

    /// Live view of the active products the storefront shows.
    #[must_use]
    pub fn live_storefront(&self) -> LiveCollection<Product> {
        LiveCollection::new(&self.repository, |product: &Product| product.active)
    }

    /// Live view of one category, or of the whole catalog when `None`.
    #[must_use]
    pub fn live(&self, category: Option<String>) -> LiveCollection<Product> {
        match category {
            Some(category) => LiveCollection::new(&self.repository, move |product: &Product| {
                product.in_category(&category)
            }),
            None => LiveCollection::unfiltered(&self.repository),
        }
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("product '{id}' does not exist"))
}

fn find_mut<'a>(products: &'a mut [Product], id: &str) -> AppResult<&'a mut Product> {
    products
        .iter_mut()
        .find(|product| product.id == id)
        .ok_or_else(|| not_found(id))
}

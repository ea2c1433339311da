//! Catalog collaborator interface.

use crate::error::{CatalogError, CatalogResult};
use crate::product::{Product, VariantRecord};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;

/// Read access to products and their variants.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn product(&self, id: &str) -> CatalogResult<Product>;

    async fn products_by_category(&self, category_id: &str) -> CatalogResult<Vec<Product>>;

    async fn products_by_subcategory(&self, subcategory_id: &str) -> CatalogResult<Vec<Product>>;

    /// Every product the store sells
    async fn store_products(&self, store_id: &str) -> CatalogResult<Vec<Product>>;

    async fn variants(&self, product_id: &str) -> CatalogResult<Vec<VariantRecord>>;
}

/// In-memory catalog. Lookups for ids marked with [`StaticCatalog::fail_on`]
/// report the catalog as unavailable.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
    variants: Vec<VariantRecord>,
    failing: HashSet<String>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    pub fn with_variants(mut self, variants: impl IntoIterator<Item = VariantRecord>) -> Self {
        self.variants.extend(variants);
        self
    }

    /// Make lookups keyed by `key` (product, category, subcategory or store id) fail
    pub fn fail_on(mut self, key: impl Into<String>) -> Self {
        self.failing.insert(key.into());
        self
    }

    fn check(&self, what: &str, key: &str) -> CatalogResult<()> {
        if self.failing.contains(key) {
            debug!(what, key, "Injected catalog failure");
            return Err(CatalogError::unavailable(
                format!("{} {}", what, key),
                "catalog service did not respond",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn product(&self, id: &str) -> CatalogResult<Product> {
        self.check("product", id)?;
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))
    }

    async fn products_by_category(&self, category_id: &str) -> CatalogResult<Vec<Product>> {
        self.check("category", category_id)?;
        Ok(self
            .products
            .iter()
            .filter(|p| p.in_category(category_id))
            .cloned()
            .collect())
    }

    async fn products_by_subcategory(&self, subcategory_id: &str) -> CatalogResult<Vec<Product>> {
        self.check("subcategory", subcategory_id)?;
        Ok(self
            .products
            .iter()
            .filter(|p| p.in_subcategory(subcategory_id))
            .cloned()
            .collect())
    }

    async fn store_products(&self, store_id: &str) -> CatalogResult<Vec<Product>> {
        self.check("store", store_id)?;
        Ok(self.products.clone())
    }

    async fn variants(&self, product_id: &str) -> CatalogResult<Vec<VariantRecord>> {
        self.check("variants", product_id)?;
        Ok(self
            .variants
            .iter()
            .filter(|v| v.product_id == product_id)
            .cloned()
            .collect())
    }
}

//! Cancellable catalog loading for a view.
//!
//! A [`PageView`] owns its catalog state. Loaders only hold a weak
//! [`ViewHandle`]; once the view is dropped, results that arrive later are
//! discarded instead of being written into state nobody renders.

use crate::catalog_data::CatalogData;
use std::sync::{Arc, Weak};
use storefront_catalog::{CatalogSource, Fetch, Product, VariantPriceTable, VariantResolver};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Catalog state owned by one mounted canvas or storefront page
#[derive(Debug)]
pub struct PageView {
    data: Arc<RwLock<CatalogData>>,
}

impl PageView {
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            data: Arc::new(RwLock::new(CatalogData::new(store_name))),
        }
    }

    pub fn handle(&self) -> ViewHandle {
        ViewHandle {
            data: Arc::downgrade(&self.data),
        }
    }

    pub async fn snapshot(&self) -> CatalogData {
        self.data.read().await.clone()
    }
}

#[derive(Debug, Clone)]
pub struct ViewHandle {
    data: Weak<RwLock<CatalogData>>,
}

impl ViewHandle {
    pub fn is_live(&self) -> bool {
        self.data.strong_count() > 0
    }

    /// Run `update` against the view's state; false if the view is gone.
    async fn apply(&self, update: impl FnOnce(&mut CatalogData)) -> bool {
        match self.data.upgrade() {
            Some(data) => {
                update(&mut *data.write().await);
                true
            }
            None => false,
        }
    }
}

/// What a view needs loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub store_id: String,
    /// Set on product pages
    pub product_id: Option<String>,
}

impl LoadRequest {
    pub fn store(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            product_id: None,
        }
    }

    pub fn product(store_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            product_id: Some(product_id.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Every result was written into the view
    Applied,
    /// The view was dropped while a fetch was in flight
    Discarded,
}

/// Fills views from a catalog source
#[derive(Clone)]
pub struct ViewLoader {
    catalog: Arc<dyn CatalogSource>,
}

impl ViewLoader {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }

    /// Load everything `request` names into `view`, one dependency at a time.
    ///
    /// Each result lands as soon as it arrives, so sections depending on an
    /// earlier fetch render while later ones are still pending. Failures are
    /// stored as failed fetch states, never returned.
    #[instrument(skip(self, view), fields(store = %request.store_id, product = ?request.product_id))]
    pub async fn load(&self, view: ViewHandle, request: LoadRequest) -> LoadOutcome {
        let products: Fetch<Vec<Product>> = self.catalog.store_products(&request.store_id).await.into();
        if !view.apply(|data| data.products = products).await {
            return discarded("products");
        }

        let Some(product_id) = request.product_id.as_deref() else {
            return LoadOutcome::Applied;
        };

        let product: Fetch<Product> = self.catalog.product(product_id).await.into();
        let current = product.ready().cloned();
        if !view.apply(|data| data.product = product).await {
            return discarded("product");
        }

        let variants: Fetch<VariantResolver> = match current {
            Some(product) => Fetch::from(self.catalog.variants(product_id).await).map(|records| {
                VariantResolver::for_product(&product, VariantPriceTable::from_variants(&records))
            }),
            None => Fetch::Failed(format!("product {} did not load", product_id)),
        };
        if !view.apply(|data| data.variants = variants).await {
            return discarded("variants");
        }

        debug!("View loaded");
        LoadOutcome::Applied
    }

    /// Run [`ViewLoader::load`] on the runtime
    pub fn spawn(&self, view: ViewHandle, request: LoadRequest) -> JoinHandle<LoadOutcome> {
        let loader = self.clone();
        tokio::spawn(async move { loader.load(view, request).await })
    }
}

fn discarded(stage: &str) -> LoadOutcome {
    debug!(stage, "View dropped before results arrived - discarding");
    LoadOutcome::Discarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::{StaticCatalog, VariantRecord};

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with_product(Product::new("tee", "Tee", 15.0).with_colors(&["Red", "Blue"]).with_sizes(&["S", "M", "L"]))
            .with_product(Product::new("mug", "Mug", 9.0))
            .with_variants([
                VariantRecord::new("tee", "Red", "S", 10.0),
                VariantRecord::new("tee", "Red", "M", 12.0),
                VariantRecord::new("tee", "Blue", "M", 9.0),
            ])
    }

    #[tokio::test]
    async fn test_load_product_page() {
        let view = PageView::new("Threads");
        let loader = ViewLoader::new(Arc::new(catalog()));

        let outcome = loader.load(view.handle(), LoadRequest::product("store-1", "tee")).await;
        assert_eq!(outcome, LoadOutcome::Applied);

        let data = view.snapshot().await;
        assert_eq!(data.products.ready().map(Vec::len), Some(2));
        assert_eq!(data.current_product_id(), Some("tee"));
        let resolver = data.variants.ready().unwrap();
        assert_eq!(resolver.selection().color.as_deref(), Some("Red"));
        assert_eq!(resolver.active_price(), 10.0);
    }

    #[tokio::test]
    async fn test_failures_become_fetch_states() {
        let view = PageView::new("Threads");
        let loader = ViewLoader::new(Arc::new(catalog().fail_on("tee")));

        let outcome = loader.load(view.handle(), LoadRequest::product("store-1", "tee")).await;
        assert_eq!(outcome, LoadOutcome::Applied);

        let data = view.snapshot().await;
        assert!(data.products.ready().is_some());
        assert!(matches!(data.product, Fetch::Failed(_)));
        assert!(matches!(data.variants, Fetch::Failed(_)));
    }

    #[tokio::test]
    async fn test_dropped_view_discards_results() {
        let view = PageView::new("Threads");
        let handle = view.handle();
        drop(view);

        assert!(!handle.is_live());
        let loader = ViewLoader::new(Arc::new(catalog()));
        assert_eq!(loader.load(handle, LoadRequest::store("store-1")).await, LoadOutcome::Discarded);
    }
}

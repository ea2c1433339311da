//! View loading with cancellation

use async_trait::async_trait;
use std::sync::Arc;
use storefront_catalog::{
    CatalogResult, CatalogSource, Fetch, Product, StaticCatalog, VariantRecord,
};
use storefront_compositor::{
    render_page, ComposeOptions, Host, LoadOutcome, LoadRequest, PageView, PlaceholderKind,
    ViewLoader,
};
use storefront_schema::{GlobalStyles, Page};
use tokio::sync::Notify;

/// Holds product lookups until released
struct GatedCatalog {
    inner: StaticCatalog,
    gate: Arc<Notify>,
}

#[async_trait]
impl CatalogSource for GatedCatalog {
    async fn product(&self, id: &str) -> CatalogResult<Product> {
        self.gate.notified().await;
        self.inner.product(id).await
    }

    async fn products_by_category(&self, category_id: &str) -> CatalogResult<Vec<Product>> {
        self.inner.products_by_category(category_id).await
    }

    async fn products_by_subcategory(&self, subcategory_id: &str) -> CatalogResult<Vec<Product>> {
        self.inner.products_by_subcategory(subcategory_id).await
    }

    async fn store_products(&self, store_id: &str) -> CatalogResult<Vec<Product>> {
        self.inner.store_products(store_id).await
    }

    async fn variants(&self, product_id: &str) -> CatalogResult<Vec<VariantRecord>> {
        self.inner.variants(product_id).await
    }
}

fn static_catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with_product(Product::new("tee", "Classic Tee", 15.0).with_colors(&["Red"]).with_sizes(&["S", "M"]))
        .with_product(Product::new("mug", "Mug", 9.0))
        .with_variants([VariantRecord::new("tee", "Red", "M", 11.0)])
}

#[tokio::test]
async fn test_results_after_teardown_are_discarded() -> anyhow::Result<()> {
    let gate = Arc::new(Notify::new());
    let loader = ViewLoader::new(Arc::new(GatedCatalog {
        inner: static_catalog(),
        gate: gate.clone(),
    }));

    let view = PageView::new("Threads");
    let handle = view.handle();
    let task = loader.spawn(handle.clone(), LoadRequest::product("store-1", "tee"));

    // products land first; the product lookup is still held at the gate
    while view.snapshot().await.products.is_pending() {
        tokio::task::yield_now().await;
    }
    drop(view);
    gate.notify_one();

    assert_eq!(task.await?, LoadOutcome::Discarded);
    assert!(!handle.is_live());
    Ok(())
}

#[tokio::test]
async fn test_loaded_view_renders_product_page() -> anyhow::Result<()> {
    let view = PageView::new("Threads");
    let loader = ViewLoader::new(Arc::new(static_catalog()));

    let page = Page::new("product", "Product", "/product");
    let before = render_page(
        &page,
        &view.snapshot().await,
        &GlobalStyles::default(),
        &ComposeOptions::default(),
        &Host::Storefront,
    );
    let details = before.section("default-product-details").expect("details region");
    assert!(details.children()[0].is_placeholder(PlaceholderKind::Loading));

    let outcome = loader.spawn(view.handle(), LoadRequest::product("store-1", "tee")).await?;
    assert_eq!(outcome, LoadOutcome::Applied);

    let data = view.snapshot().await;
    assert!(matches!(data.product, Fetch::Ready(_)));

    let after = render_page(&page, &data, &GlobalStyles::default(), &ComposeOptions::default(), &Host::Storefront);
    let details = after.section("default-product-details").expect("details region");
    assert!(details.text_content().contains("Classic Tee"));
    assert!(details.text_content().contains("$11.00"));

    let recs = after.section("default-product-recommendations").expect("recommendations region");
    assert!(recs.text_content().contains("Mug"));
    assert!(!recs.text_content().contains("Classic Tee"));

    Ok(())
}

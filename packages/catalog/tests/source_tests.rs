use storefront_catalog::{
    CatalogError, CatalogSource, Fetch, Product, StaticCatalog, VariantPriceTable,
    VariantRecord, VariantResolver,
};

fn catalog() -> StaticCatalog {
    let mut tee = Product::new("tee", "Classic Tee", 15.0).with_sizes(&["S", "M", "L"]);
    tee.colors = vec!["Red".to_string(), "Blue".to_string()];
    tee.subcategory_ids = vec!["tees".to_string()];

    let mut mug = Product::new("mug", "Mug", 8.0);
    mug.category_id = Some("drinkware".to_string());

    StaticCatalog::new()
        .with_product(tee)
        .with_product(mug)
        .with_variants(vec![
            VariantRecord::new("tee", "Red", "S", 10.0).with_hex("#dc2626"),
            VariantRecord::new("tee", "Red", "M", 12.0),
            VariantRecord::new("tee", "Blue", "M", 9.0).with_hex("#2563eb"),
        ])
        .fail_on("broken")
}

#[tokio::test]
async fn test_variant_lookup_builds_price_table() -> anyhow::Result<()> {
    let catalog = catalog();
    let product = catalog.product("tee").await?;
    let variants = catalog.variants("tee").await?;

    let mut resolver = VariantResolver::for_product(&product, VariantPriceTable::from_variants(&variants));
    assert_eq!(resolver.selection().color.as_deref(), Some("Red"));
    assert_eq!(resolver.selection().size.as_deref(), Some("S"));
    assert_eq!(resolver.active_price(), 10.0);

    resolver.select_color("Blue");
    assert_eq!(resolver.selection().size.as_deref(), Some("M"));
    assert_eq!(resolver.available_sizes("Blue"), vec!["M"]);
    assert_eq!(resolver.price("Red", "L"), 15.0);
    assert_eq!(resolver.table().swatch("Blue"), Some("#2563eb"));
    Ok(())
}

#[tokio::test]
async fn test_lookups_filter_by_category_and_subcategory() -> anyhow::Result<()> {
    let catalog = catalog();
    let tees = catalog.products_by_subcategory("tees").await?;
    assert_eq!(tees.len(), 1);
    assert_eq!(tees[0].id, "tee");

    let drinkware = catalog.products_by_category("drinkware").await?;
    assert_eq!(drinkware[0].id, "mug");
    assert_eq!(catalog.store_products("store-1").await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_failures_surface_as_failed_fetch() {
    let catalog = catalog();

    let missing: Fetch<Product> = catalog.product("nope").await.into();
    assert!(matches!(missing, Fetch::Failed(_)));

    let broken = catalog.variants("broken").await;
    assert!(matches!(broken, Err(CatalogError::Unavailable { .. })));
}

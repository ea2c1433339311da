//! Catalog state a page render depends on.

use crate::error::{RenderError, RenderResult};
use storefront_catalog::{Fetch, Product, VariantResolver};
use storefront_schema::settings::{CollectionEntry, FilterBy};

/// Everything product sections read, each dependency in its own fetch state
/// so one pending or failed lookup only affects the sections that need it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogData {
    pub store_name: String,
    /// Every product the store sells
    pub products: Fetch<Vec<Product>>,
    /// The product shown on a product page
    pub product: Fetch<Product>,
    /// Variant pricing for `product`
    pub variants: Fetch<VariantResolver>,
}

impl CatalogData {
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            ..Self::default()
        }
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = Fetch::Ready(products);
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.product = Fetch::Ready(product);
        self
    }

    pub fn with_variants(mut self, resolver: VariantResolver) -> Self {
        self.variants = Fetch::Ready(resolver);
        self
    }

    pub fn current_product_id(&self) -> Option<&str> {
        self.product.ready().map(|p| p.id.as_str())
    }
}

/// `Ok(None)` while pending, `Err` once the fetch failed.
pub(crate) fn ready<'a, T>(fetch: &'a Fetch<T>, what: &str) -> RenderResult<Option<&'a T>> {
    match fetch {
        Fetch::Pending => Ok(None),
        Fetch::Ready(value) => Ok(Some(value)),
        Fetch::Failed(reason) => Err(RenderError::MissingCatalogData {
            what: what.to_string(),
            reason: reason.clone(),
        }),
    }
}

/// Products picked by id, in the order the ids are listed; unknown ids are skipped.
pub(crate) fn pick_products<'a>(products: &'a [Product], ids: &[String]) -> Vec<&'a Product> {
    ids.iter()
        .filter_map(|id| products.iter().find(|p| &p.id == id))
        .collect()
}

/// Products belonging to one collection entry under the active filter mode
pub(crate) fn collection_products<'a>(
    products: &'a [Product],
    entry: &CollectionEntry,
    filter_by: FilterBy,
) -> Vec<&'a Product> {
    let Some(filter_id) = entry.filter_id(filter_by) else {
        return Vec::new();
    };
    products
        .iter()
        .filter(|p| match filter_by {
            FilterBy::Subcategory => p.in_subcategory(filter_id),
            FilterBy::Category => p.in_category(filter_id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product::new(id, id.to_uppercase(), 10.0)
    }

    #[test]
    fn test_ready_states() {
        let pending: Fetch<u32> = Fetch::Pending;
        assert_eq!(ready(&pending, "x"), Ok(None));
        assert_eq!(ready(&Fetch::Ready(3), "x"), Ok(Some(&3)));
        assert!(matches!(
            ready(&Fetch::<u32>::Failed("down".into()), "products"),
            Err(RenderError::MissingCatalogData { what, .. }) if what == "products"
        ));
    }

    #[test]
    fn test_pick_products_keeps_listed_order() {
        let products = vec![product("a"), product("b"), product("c")];
        let ids = vec!["c".to_string(), "zzz".to_string(), "a".to_string()];
        let picked: Vec<&str> = pick_products(&products, &ids).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(picked, vec!["c", "a"]);
    }

    #[test]
    fn test_collection_products_follow_filter_mode() {
        let mut tee = product("tee");
        tee.category_id = Some("apparel".into());
        tee.subcategory_ids = vec!["tees".into()];
        let mug = product("mug");
        let products = vec![tee, mug];

        let entry = CollectionEntry {
            name: "Tees".into(),
            subcategory_id: "tees".into(),
            category_id: "apparel".into(),
            image_url: String::new(),
        };
        assert_eq!(collection_products(&products, &entry, FilterBy::Subcategory).len(), 1);
        assert_eq!(collection_products(&products, &entry, FilterBy::Category).len(), 1);

        let unset = CollectionEntry::default();
        assert!(collection_products(&products, &unset, FilterBy::Category).is_empty());
    }
}

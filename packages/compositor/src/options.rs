use serde::{Deserialize, Serialize};
use storefront_schema::HOME_SLUG;

/// Route of the product detail page
pub const PRODUCT_SLUG: &str = "/product";

/// Compositor configuration.
///
/// Deserializes from a partial camelCase record; missing keys keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComposeOptions {
    pub home_slug: String,
    /// Pages with this slug get the mandatory product regions
    pub product_slug: String,
    /// Storefront renders a store header when the page has no visible header section
    pub store_header: bool,
    /// `maxItems` of a synthesized recommendations region
    pub recommendation_count: u32,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            home_slug: HOME_SLUG.to_string(),
            product_slug: PRODUCT_SLUG.to_string(),
            store_header: true,
            recommendation_count: 4,
        }
    }
}

impl ComposeOptions {
    pub fn is_product_page(&self, slug: &str) -> bool {
        slug == self.product_slug
    }
}

/// Where a render tree will be shown
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Host {
    /// Authoring canvas; the selected section is flagged for highlighting
    Canvas { selected: Option<String> },
    /// Public storefront
    #[default]
    Storefront,
}

impl Host {
    pub fn canvas(selected: Option<&str>) -> Self {
        Host::Canvas {
            selected: selected.map(str::to_string),
        }
    }

    pub fn is_storefront(&self) -> bool {
        matches!(self, Host::Storefront)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_options_keep_defaults() {
        let options: ComposeOptions =
            serde_json::from_value(json!({ "storeHeader": false })).unwrap();
        assert!(!options.store_header);
        assert_eq!(options.product_slug, "/product");
        assert_eq!(options.home_slug, "/");
        assert_eq!(options.recommendation_count, 4);
    }
}

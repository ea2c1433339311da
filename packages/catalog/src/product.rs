//! Catalog records consumed by product sections.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Color shown when a product declares none
pub const DEFAULT_COLOR: &str = "Default";
/// Size shown when a product declares none
pub const DEFAULT_SIZE: &str = "One Size";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub url: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// A sellable product as the catalog reports it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<f64>,
    pub gallery_images: Vec<GalleryImage>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub subcategory_ids: Vec<String>,
    pub attributes: Map<String, Value>,
    /// Master color list, in display order
    pub colors: Vec<String>,
    /// Master size list, in display order
    pub sizes: Vec<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price,
            ..Product::default()
        }
    }

    pub fn with_sizes(mut self, sizes: &[&str]) -> Self {
        self.sizes = sizes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_colors(mut self, colors: &[&str]) -> Self {
        self.colors = colors.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_image(mut self, url: &str, is_primary: bool) -> Self {
        self.gallery_images.push(GalleryImage {
            url: url.to_string(),
            is_primary,
        });
        self
    }

    /// Primary gallery image, else the first one
    pub fn primary_image(&self) -> Option<&str> {
        self.gallery_images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.gallery_images.first())
            .map(|img| img.url.as_str())
            .filter(|url| !url.is_empty())
    }

    pub fn image_urls(&self) -> Vec<&str> {
        self.gallery_images
            .iter()
            .map(|img| img.url.as_str())
            .filter(|url| !url.is_empty())
            .collect()
    }

    pub fn master_colors(&self) -> Vec<String> {
        if self.colors.is_empty() {
            vec![DEFAULT_COLOR.to_string()]
        } else {
            self.colors.clone()
        }
    }

    pub fn master_sizes(&self) -> Vec<String> {
        if self.sizes.is_empty() {
            vec![DEFAULT_SIZE.to_string()]
        } else {
            self.sizes.clone()
        }
    }

    pub fn in_category(&self, category_id: &str) -> bool {
        self.category_id.as_deref() == Some(category_id)
    }

    pub fn in_subcategory(&self, subcategory_id: &str) -> bool {
        self.subcategory_ids.iter().any(|id| id == subcategory_id)
    }

    /// Compare-at price, when it is above the selling price
    pub fn discount_from(&self) -> Option<f64> {
        self.compare_at_price.filter(|compare| *compare > self.base_price)
    }
}

/// One color/size combination with its own price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    pub product_id: String,
    pub color: String,
    pub size: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
}

impl VariantRecord {
    pub fn new(product_id: &str, color: &str, size: &str, price: f64) -> Self {
        Self {
            product_id: product_id.to_string(),
            color: color.to_string(),
            size: size.to_string(),
            price,
            color_hex: None,
        }
    }

    pub fn with_hex(mut self, hex: &str) -> Self {
        self.color_hex = Some(hex.to_string());
        self
    }
}

//! # Variant Price Resolver
//!
//! A [`VariantPriceTable`] maps color → size → price. The
//! [`VariantResolver`] layers a product's master size list and base price
//! over it and keeps the shopper's color/size selection consistent: a size
//! with no priced entry under the selected color is hidden, and changing
//! color moves the size to the first master size still available.

use crate::product::{Product, VariantRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VariantPriceTable {
    prices: HashMap<String, HashMap<String, f64>>,
    swatches: HashMap<String, String>,
}

impl VariantPriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from variant records; a later record for the same pair wins.
    pub fn from_variants(variants: &[VariantRecord]) -> Self {
        let mut table = Self::new();
        for variant in variants {
            table.insert(&variant.color, &variant.size, variant.price);
            if let Some(hex) = variant.color_hex.as_deref().filter(|h| !h.is_empty()) {
                table
                    .swatches
                    .entry(variant.color.clone())
                    .or_insert_with(|| hex.to_string());
            }
        }
        table
    }

    pub fn insert(&mut self, color: &str, size: &str, price: f64) {
        self.prices
            .entry(color.to_string())
            .or_default()
            .insert(size.to_string(), price);
    }

    pub fn with_price(mut self, color: &str, size: &str, price: f64) -> Self {
        self.insert(color, size, price);
        self
    }

    pub fn get(&self, color: &str, size: &str) -> Option<f64> {
        self.prices.get(color)?.get(size).copied()
    }

    pub fn has_entry(&self, color: &str, size: &str) -> bool {
        self.get(color, size).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.values().all(HashMap::is_empty)
    }

    /// Display color for a swatch, when the variants carried one
    pub fn swatch(&self, color: &str) -> Option<&str> {
        self.swatches.get(color).map(String::as_str)
    }
}

/// Current shopper selection; either half may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariantSelection {
    pub color: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantResolver {
    table: VariantPriceTable,
    base_price: f64,
    master_sizes: Vec<String>,
    selection: VariantSelection,
}

impl VariantResolver {
    pub fn new(table: VariantPriceTable, base_price: f64, master_sizes: Vec<String>) -> Self {
        Self {
            table,
            base_price,
            master_sizes,
            selection: VariantSelection::default(),
        }
    }

    /// Resolver for a product page, preselecting the first color.
    pub fn for_product(product: &Product, table: VariantPriceTable) -> Self {
        let mut resolver = Self::new(table, product.base_price, product.master_sizes());
        if let Some(color) = product.master_colors().first() {
            resolver.select_color(color);
        }
        resolver
    }

    pub fn table(&self) -> &VariantPriceTable {
        &self.table
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    pub fn selection(&self) -> &VariantSelection {
        &self.selection
    }

    /// Price of one combination, falling back to the base price.
    pub fn price(&self, color: &str, size: &str) -> f64 {
        self.table.get(color, size).unwrap_or(self.base_price)
    }

    /// Master sizes with a priced entry under `color`, in master order.
    ///
    /// A product without any variant data has no table to constrain it, so
    /// every master size stays available.
    pub fn available_sizes(&self, color: &str) -> Vec<&str> {
        self.master_sizes
            .iter()
            .map(String::as_str)
            .filter(|size| self.table.is_empty() || self.table.has_entry(color, size))
            .collect()
    }

    pub fn is_available(&self, color: &str, size: &str) -> bool {
        self.available_sizes(color).contains(&size)
    }

    /// Select a color, reassigning the size if it is not offered under it.
    pub fn select_color(&mut self, color: &str) {
        let keep_size = self
            .selection
            .size
            .as_deref()
            .is_some_and(|size| self.is_available(color, size));

        if !keep_size {
            let next = self.available_sizes(color).first().map(|s| s.to_string());
            debug!(color, previous = ?self.selection.size, next = ?next, "Reassigning size for color");
            self.selection.size = next;
        }
        self.selection.color = Some(color.to_string());
    }

    /// Select a size offered under the current color; returns false otherwise.
    pub fn select_size(&mut self, size: &str) -> bool {
        let Some(color) = self.selection.color.as_deref() else {
            return false;
        };
        if !self.is_available(color, size) {
            return false;
        }
        self.selection.size = Some(size.to_string());
        true
    }

    /// Price of the current selection; the base price until both halves are chosen.
    pub fn active_price(&self) -> f64 {
        match (&self.selection.color, &self.selection.size) {
            (Some(color), Some(size)) => self.price(color, size),
            _ => self.base_price,
        }
    }
}

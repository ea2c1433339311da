//! # Storefront Catalog
//!
//! Catalog records that feed product sections, the async collaborator
//! interface that supplies them, and the variant price resolver used by
//! product pages.

mod error;
mod fetch;
mod pricing;
mod product;
mod source;

pub use error::{CatalogError, CatalogResult};
pub use fetch::Fetch;
pub use pricing::{VariantPriceTable, VariantResolver, VariantSelection};
pub use product::{GalleryImage, Product, VariantRecord, DEFAULT_COLOR, DEFAULT_SIZE};
pub use source::{CatalogSource, StaticCatalog};

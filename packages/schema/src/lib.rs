//! # Storefront Schema
//!
//! Persisted document model of a section-composed storefront.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Store → Builder → Page[] → Section[]        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ schema: per-type fields, kinds, bounds      │
//! │ settings: typed, fully defaulted records    │
//! │ styles: global tokens + section overrides   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Always defaulted**: a loaded section never carries a missing or
//!    malformed settings field; each one falls back to its type default
//! 2. **Closed type set**: unknown section types load and save unchanged
//!    but expose no fields
//! 3. **Per-side cascade**: padding and margin sides default independently
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_schema::{resolve_style, GlobalStyles, Page};
//!
//! let page: Page = serde_json::from_str(json)?;
//! for section in &page.sections {
//!     let style = resolve_style(&GlobalStyles::default(), section);
//! }
//! ```

mod document;
mod error;
mod lenient;
mod list;
pub mod schema;
mod section;
mod section_type;
pub mod settings;
mod styles;

pub use document::{Builder, Page, Store, BUILDER_VERSION, HOME_PAGE_ID, HOME_SLUG};
pub use error::{SchemaError, SchemaResult};
pub use lenient::number_from;
pub use list::{Direction, IndexedList};
pub use schema::{fields_for, field_spec, CoerceMode, FieldKind, FieldSpec, ListSpec, ShownWhen};
pub use section::{Section, SectionDocument};
pub use section_type::{SectionCategory, SectionType};
pub use settings::{defaulted_settings, SectionSettings};
pub use styles::{
    resolve_style, ButtonStyle, CardStyle, GlobalStyles, PartialSides, ResolvedStyle,
    SectionStyles, Side, Sides, Spacing, StyleField, TextAlign, DEFAULT_MARGIN, DEFAULT_PADDING,
};

//! # Storefront Compositor
//!
//! Turns a page's section list plus catalog data into a render tree shown
//! identically by the authoring canvas and the public storefront.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │  CanvasHost  │   │StorefrontHost│      thin adapters
//! └──────┬───────┘   └──────┬───────┘
//!        └────────┬─────────┘
//!                 ▼
//!        ┌─────────────────┐     ┌─────────────┐
//!        │   Compositor    │◀────│ CatalogData │◀── ViewLoader (async)
//!        │ order · filter  │     └─────────────┘
//!        │ dispatch · rules│
//!        └────────┬────────┘
//!                 ▼
//!        ┌─────────────────┐
//!        │ views (per type)│──▶ RenderTree (VNode)
//!        └─────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One composition function**: hosts never reimplement ordering,
//!    visibility or dispatch.
//! 2. **Per-section isolation**: an unknown type or a failed catalog fetch
//!    affects only its own section.
//! 3. **Loading is cancellable**: results for a dropped view are discarded.

mod catalog_data;
mod compositor;
mod error;
mod hosts;
#[cfg(feature = "async")]
mod loader;
mod options;
mod vdom;
mod views;

pub use catalog_data::CatalogData;
pub use compositor::{ordered_visible, render_page, Compositor};
pub use error::{RenderError, RenderResult};
pub use hosts::{CanvasHost, StorefrontHost};
#[cfg(feature = "async")]
pub use loader::{LoadOutcome, LoadRequest, PageView, ViewHandle, ViewLoader};
pub use options::{ComposeOptions, Host, PRODUCT_SLUG};
pub use vdom::{
    PlaceholderKind, RenderTree, VNode, REGION_ATTR, SECTION_ID_ATTR, SECTION_TYPE_ATTR,
    SELECTED_ATTR,
};
pub use views::SIZE_CHART;

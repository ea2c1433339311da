//! Page composition.
//!
//! One pure function turns a page plus catalog data into a render tree.
//! Both hosts call it; only the storefront rules below depend on the host.
//!
//! ```text
//!   sections ──▶ stable sort by order ──▶ drop hidden ──▶ [storefront rules] ──▶ views ──▶ RenderTree
//!                                                          │
//!                                                          ├─ hoist announcement bars
//!                                                          ├─ store header if none
//!                                                          └─ product page regions
//! ```

use crate::catalog_data::CatalogData;
use crate::error::RenderError;
use crate::options::{ComposeOptions, Host};
use crate::vdom::{RenderTree, VNode, REGION_ATTR, SECTION_ID_ATTR, SECTION_TYPE_ATTR, SELECTED_ATTR};
use crate::views::{self, ViewContext};
use std::borrow::Cow;
use storefront_schema::{resolve_style, Builder, GlobalStyles, Page, Section, SectionType};
use tracing::{debug, info, instrument, warn};

/// Renders pages against one store's style tokens
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    global: GlobalStyles,
    options: ComposeOptions,
}

impl Compositor {
    pub fn new(global: GlobalStyles, options: ComposeOptions) -> Self {
        Self { global, options }
    }

    pub fn for_builder(builder: &Builder, options: ComposeOptions) -> Self {
        Self::new(builder.global_styles.clone(), options)
    }

    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    pub fn global_styles(&self) -> &GlobalStyles {
        &self.global
    }

    #[instrument(skip(self, page, data), fields(page = %page.id, slug = %page.slug, sections = page.sections.len()))]
    pub fn render(&self, page: &Page, data: &CatalogData, host: &Host) -> RenderTree {
        let visible = ordered_visible(&page.sections);
        let mut tree = RenderTree::new();

        if !host.is_storefront() {
            for section in visible {
                self.push_section(&mut tree, section, data, host);
            }
            info!(nodes = tree.nodes.len(), "Canvas composition complete");
            return tree;
        }

        let (bars, rest): (Vec<&Section>, Vec<&Section>) = visible
            .into_iter()
            .partition(|s| s.section_type() == SectionType::AnnouncementBar);

        for bar in &bars {
            self.push_section(&mut tree, bar, data, host);
        }

        let has_header = rest.iter().any(|s| s.section_type() == SectionType::Header);
        if self.options.store_header && !has_header {
            self.push_store_header(&mut tree, data);
        }

        for section in &rest {
            self.push_section(&mut tree, section, data, host);
        }

        if self.options.is_product_page(&page.slug) {
            for section in self.missing_product_regions(&rest) {
                debug!(section_type = %section.section_type(), "Adding default product region");
                self.push_section(&mut tree, &section, data, host);
            }
        }

        info!(nodes = tree.nodes.len(), hoisted = bars.len(), "Storefront composition complete");
        tree
    }

    /// Default instances of the product regions the page does not render itself
    fn missing_product_regions(&self, rendered: &[&Section]) -> Vec<Section> {
        let mut missing = Vec::new();
        let has = |t: SectionType| rendered.iter().any(|s| s.section_type() == t);

        if !has(SectionType::ProductDetails) {
            missing.push(Section::new("default-product-details", SectionType::ProductDetails, f64::MAX));
        }
        if !has(SectionType::ProductRecommendations) {
            let section = Section::new(
                "default-product-recommendations",
                SectionType::ProductRecommendations,
                f64::MAX,
            );
            let mut patch = serde_json::Map::new();
            patch.insert("maxItems".to_string(), self.options.recommendation_count.into());
            missing.push(section.with_settings(&patch));
        }
        missing
    }

    fn context<'a>(
        &'a self,
        section_id: &'a str,
        data: &'a CatalogData,
        style: &'a storefront_schema::ResolvedStyle,
    ) -> ViewContext<'a> {
        ViewContext {
            section_id,
            data,
            style,
            global: &self.global,
            options: &self.options,
        }
    }

    fn push_section(&self, tree: &mut RenderTree, section: &Section, data: &CatalogData, host: &Host) {
        if let Some(node) = self.render_section(section, data, host) {
            tree.add_node(node);
        }
    }

    /// One section, isolated: its failure never reaches its siblings.
    fn render_section(&self, section: &Section, data: &CatalogData, host: &Host) -> Option<VNode> {
        let style = resolve_style(&self.global, section);
        let ctx = self.context(&section.id, data, &style);

        let children = match views::render_settings(&section.settings, &ctx) {
            Ok(children) => children,
            Err(RenderError::UnknownSectionType(type_name)) => {
                warn!(section_id = %section.id, section_type = %type_name, "Skipping section with unregistered type");
                return None;
            }
            Err(e) => {
                warn!(section_id = %ctx.section_id, error = %e, "Section rendered as unavailable");
                vec![VNode::unavailable(unavailable_message(&e))]
            }
        };

        let mut node = VNode::element("section")
            .with_key(section.id.clone())
            .with_attr(SECTION_ID_ATTR, section.id.clone())
            .with_attr(SECTION_TYPE_ATTR, section.section_type().as_str())
            .with_styles(style.to_css())
            .with_children(children);

        if let Host::Canvas { selected } = host {
            let is_selected = selected.as_deref() == Some(section.id.as_str());
            node = node.with_attr(SELECTED_ATTR, is_selected.to_string());
        }
        Some(node)
    }

    fn push_store_header(&self, tree: &mut RenderTree, data: &CatalogData) {
        let defaults = Section::new("store-header", SectionType::Header, 0);
        let style = resolve_style(&self.global, &defaults);
        let ctx = self.context("store-header", data, &style);

        match views::store_header(&ctx) {
            Ok(children) => tree.add_node(
                VNode::element("div")
                    .with_attr(REGION_ATTR, "store-header")
                    .with_styles(style.to_css())
                    .with_children(children),
            ),
            Err(e) => warn!(error = %e, "Store header unavailable"),
        }
    }
}

fn unavailable_message(error: &RenderError) -> Cow<'static, str> {
    match error {
        RenderError::MissingCatalogData { what, .. } => {
            Cow::Owned(format!("This content is unavailable right now ({})", what))
        }
        RenderError::InvalidMedia { .. } => Cow::Borrowed("This media cannot be displayed"),
        RenderError::UnknownSectionType(_) => Cow::Borrowed("This section cannot be displayed"),
    }
}

/// Sections in render order: ascending `order`, ties kept in document
/// order, hidden sections dropped.
pub fn ordered_visible(sections: &[Section]) -> Vec<&Section> {
    let mut ordered: Vec<&Section> = sections.iter().filter(|s| s.visible).collect();
    ordered.sort_by(|a, b| a.order.total_cmp(&b.order));
    ordered
}

/// Render `page` for `host`; the single entry point both hosts share.
pub fn render_page(
    page: &Page,
    data: &CatalogData,
    global: &GlobalStyles,
    options: &ComposeOptions,
    host: &Host,
) -> RenderTree {
    Compositor::new(global.clone(), options.clone()).render(page, data, host)
}

//! Per-type section views.
//!
//! Each view turns one typed settings record into the children of its
//! section node. Views never see the host: whatever they build is shown
//! the same way on the canvas and on the storefront.

mod commerce;
mod content;
mod layout;

use crate::catalog_data::CatalogData;
use crate::error::{RenderError, RenderResult};
use crate::options::ComposeOptions;
use crate::vdom::VNode;
use storefront_catalog::Product;
use storefront_schema::{GlobalStyles, ResolvedStyle, SectionSettings};

pub(crate) use layout::store_header;
pub use commerce::SIZE_CHART;

/// What a view may read besides its own settings
pub(crate) struct ViewContext<'a> {
    pub section_id: &'a str,
    pub data: &'a CatalogData,
    pub style: &'a ResolvedStyle,
    pub global: &'a GlobalStyles,
    pub options: &'a ComposeOptions,
}

/// Dispatch on the settings variant
pub(crate) fn render_settings(
    settings: &SectionSettings,
    ctx: &ViewContext<'_>,
) -> RenderResult<Vec<VNode>> {
    match settings {
        SectionSettings::AnnouncementBar(s) => layout::announcement_bar(s, ctx),
        SectionSettings::Header(s) => layout::header(s, ctx),
        SectionSettings::Footer(s) => layout::footer(s, ctx),
        SectionSettings::Hero(s) => content::hero(s, ctx),
        SectionSettings::Text(s) => content::text(s, ctx),
        SectionSettings::Newsletter(s) => content::newsletter(s, ctx),
        SectionSettings::Image(s) => content::image(s, ctx),
        SectionSettings::Video(s) => content::video(s, ctx),
        SectionSettings::Testimonials(s) => content::testimonials(s, ctx),
        SectionSettings::CustomHtml(s) => content::custom_html(s, ctx),
        SectionSettings::ProductGrid(s) => commerce::product_grid(s, ctx),
        SectionSettings::ProductCollection(s) => commerce::product_collection(s, ctx),
        SectionSettings::ProductDetails(s) => commerce::product_details(s, ctx),
        SectionSettings::ProductRecommendations(s) => commerce::product_recommendations(s, ctx),
        SectionSettings::Unknown { type_name, .. } => {
            Err(RenderError::UnknownSectionType(type_name.clone()))
        }
    }
}

pub(crate) fn heading(tag: &str, content: &str, ctx: &ViewContext<'_>) -> Option<VNode> {
    if content.trim().is_empty() {
        return None;
    }
    Some(
        VNode::element(tag)
            .with_style("font-family", ctx.style.heading_font.clone())
            .with_child(VNode::text(content)),
    )
}

pub(crate) fn paragraph(content: &str) -> Option<VNode> {
    if content.trim().is_empty() {
        return None;
    }
    Some(VNode::element("p").with_child(VNode::text(content)))
}

pub(crate) fn link(href: &str, label: &str) -> VNode {
    VNode::element("a")
        .with_attr("href", href)
        .with_child(VNode::text(label))
}

pub(crate) fn button(label: &str, ctx: &ViewContext<'_>) -> VNode {
    VNode::element("button")
        .with_class(&format!("button button-{}", button_class(ctx.global)))
        .with_style("background-color", ctx.style.accent_color.clone())
        .with_child(VNode::text(label))
}

fn button_class(global: &GlobalStyles) -> &'static str {
    match global.button_style {
        storefront_schema::ButtonStyle::Rounded => "rounded",
        storefront_schema::ButtonStyle::Square => "square",
        storefront_schema::ButtonStyle::Pill => "pill",
    }
}

pub(crate) fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Product tile shared by grids, collections and recommendations
pub(crate) fn product_card(product: &Product, show_price: bool, price_prefix: &str) -> VNode {
    let image = match product.primary_image() {
        Some(url) => VNode::element("img")
            .with_attr("src", url)
            .with_attr("alt", product.name.clone()),
        None => VNode::element("div").with_class("product-image-empty"),
    };

    let price = show_price.then(|| {
        VNode::element("p")
            .with_class("product-price")
            .with_child(VNode::text(format!("{}{}", price_prefix, format_price(product.base_price))))
    });

    VNode::element("article")
        .with_class("product-card")
        .with_key(product.id.clone())
        .with_attr("data-product-id", product.id.clone())
        .with_child(image)
        .with_child(VNode::element("h3").with_child(VNode::text(product.name.clone())))
        .with_optional_child(price)
}

/// Columns declared through the CSS grid
pub(crate) fn grid(columns: u32) -> VNode {
    VNode::element("div")
        .with_class("grid")
        .with_style("display", "grid")
        .with_style("grid-template-columns", format!("repeat({}, minmax(0, 1fr))", columns.max(1)))
}

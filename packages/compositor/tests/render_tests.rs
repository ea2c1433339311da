//! Page composition across both hosts

use serde_json::json;
use storefront_catalog::{Fetch, Product, VariantPriceTable, VariantResolver};
use storefront_compositor::{
    render_page, CatalogData, ComposeOptions, Host, PlaceholderKind, RenderTree, VNode,
    SECTION_ID_ATTR, SIZE_CHART,
};
use storefront_schema::{GlobalStyles, Page, Section, SectionType};

fn page(slug: &str, sections: Vec<Section>) -> Page {
    let mut page = Page::new("page", "Page", slug);
    page.sections = sections;
    page
}

fn render(page: &Page, data: &CatalogData, host: Host) -> RenderTree {
    render_page(page, data, &GlobalStyles::default(), &ComposeOptions::default(), &host)
}

fn shirt() -> Product {
    Product::new("tee", "Classic Tee", 15.0)
        .with_colors(&["Red", "Blue"])
        .with_sizes(&["S", "M", "L"])
        .with_image("https://cdn.example/tee.png", true)
}

fn catalog() -> CatalogData {
    let products = vec![
        shirt(),
        Product::new("mug", "Mug", 9.0),
        Product::new("cap", "Cap", 12.0),
        Product::new("tote", "Tote", 18.0),
    ];
    let table = VariantPriceTable::new()
        .with_price("Red", "S", 10.0)
        .with_price("Red", "M", 12.0)
        .with_price("Blue", "M", 9.0);
    CatalogData::new("Threads")
        .with_products(products)
        .with_product(shirt())
        .with_variants(VariantResolver::for_product(&shirt(), table))
}

fn find_all<'a>(node: &'a VNode, predicate: &dyn Fn(&VNode) -> bool) -> Vec<&'a VNode> {
    let mut found = Vec::new();
    node.find_all(predicate, &mut found);
    found
}

#[test]
fn test_render_order_and_visibility() {
    let page = page(
        "/",
        vec![
            Section::new("A", SectionType::Text, 3),
            Section::new("B", SectionType::Text, 1),
            Section::new("C", SectionType::Text, 1),
            Section::new("hidden", SectionType::Hero, 0).hidden(),
        ],
    );

    let tree = render(&page, &CatalogData::default(), Host::canvas(None));
    assert_eq!(tree.section_ids(), vec!["B", "C", "A"]);

    let tree = render(&page, &CatalogData::default(), Host::Storefront);
    assert_eq!(tree.section_ids(), vec!["B", "C", "A"]);
}

#[test]
fn test_fractional_order_from_document() {
    let sections: Vec<Section> = serde_json::from_value(json!([
        { "id": "B", "type": "text", "order": 2 },
        { "id": "A", "type": "text", "order": 1.5 }
    ]))
    .unwrap();

    let tree = render(&page("/", sections), &CatalogData::default(), Host::Storefront);
    assert_eq!(tree.section_ids(), vec!["A", "B"]);
}

#[test]
fn test_padding_resolves_per_side() {
    let mut plain = Section::new("plain", SectionType::CustomHtml, 0);
    plain.styles.padding = None;

    let partial: Section = serde_json::from_value(json!({
        "id": "partial", "type": "custom-html", "order": 1,
        "styles": { "padding": { "top": 10 } }
    }))
    .unwrap();

    let tree = render(&page("/", vec![plain, partial]), &CatalogData::default(), Host::canvas(None));
    assert_eq!(tree.section("plain").unwrap().style("padding"), Some("32px 32px 32px 32px"));
    assert_eq!(tree.section("partial").unwrap().style("padding"), Some("10px 32px 32px 32px"));
    assert_eq!(tree.section("partial").unwrap().style("margin"), Some("0px 0px 0px 0px"));
}

#[test]
fn test_product_page_synthesizes_mandatory_regions() {
    let page = page("/product", vec![Section::new("hero", SectionType::Hero, 0)]);
    let tree = render(&page, &catalog(), Host::Storefront);

    let details = tree.sections_of_type("product-details");
    assert_eq!(details.len(), 1);
    assert_eq!(tree.sections_of_type("product-recommendations").len(), 1);

    let ids = tree.section_ids();
    assert_eq!(ids, vec!["hero", "default-product-details", "default-product-recommendations"]);

    // all-default settings: badge, reviews and size chart are on
    let text = details[0].text_content();
    assert!(text.contains("Bestseller"));
    assert!(text.contains("Customer reviews"));
    assert!(text.contains("Size chart"));
}

#[test]
fn test_product_page_keeps_its_own_regions() {
    let details = Section::new("details", SectionType::ProductDetails, 1)
        .with_settings(json!({ "badgeText": "New" }).as_object().unwrap());
    let page = page(
        "/product",
        vec![details, Section::new("recs", SectionType::ProductRecommendations, 0)],
    );
    let tree = render(&page, &catalog(), Host::Storefront);

    assert_eq!(tree.section_ids(), vec!["recs", "details"]);
    assert!(tree.section("details").unwrap().text_content().contains("New"));
}

#[test]
fn test_canvas_does_not_synthesize_regions() {
    let page = page("/product", vec![Section::new("hero", SectionType::Hero, 0)]);
    let tree = render(&page, &catalog(), Host::canvas(Some("hero")));
    assert_eq!(tree.section_ids(), vec!["hero"]);
}

#[test]
fn test_unknown_type_does_not_abort_siblings() {
    let unknown: Section = serde_json::from_value(json!({
        "id": "legacy", "type": "instagram-feed", "order": 1, "visible": true, "settings": {}
    }))
    .unwrap();
    let page = page(
        "/",
        vec![
            Section::new("hero", SectionType::Hero, 0),
            unknown,
            Section::new("news", SectionType::Newsletter, 2),
        ],
    );

    for host in [Host::canvas(None), Host::Storefront] {
        let tree = render(&page, &CatalogData::default(), host);
        assert_eq!(tree.section_ids(), vec!["hero", "news"]);
    }
}

#[test]
fn test_failed_catalog_marks_only_dependent_sections() {
    let mut data = catalog();
    data.products = Fetch::Failed("catalog service did not respond".to_string());

    let page = page(
        "/",
        vec![
            Section::new("grid", SectionType::ProductGrid, 0),
            Section::new("text", SectionType::Text, 1),
        ],
    );
    let tree = render(&page, &data, Host::Storefront);

    let grid = tree.section("grid").unwrap();
    assert!(grid.children().iter().any(|n| n.is_placeholder(PlaceholderKind::Unavailable)));

    let text = tree.section("text").unwrap();
    assert!(text.text_content().contains("About Us"));
    assert!(find_all(text, &|n| matches!(n, VNode::Placeholder { .. })).is_empty());
}

#[test]
fn test_pending_catalog_shows_loading() {
    let page = page("/", vec![Section::new("grid", SectionType::ProductGrid, 0)]);
    let tree = render(&page, &CatalogData::new("Threads"), Host::Storefront);

    let grid = tree.section("grid").unwrap();
    assert!(grid.children().iter().any(|n| n.is_placeholder(PlaceholderKind::Loading)));
    assert!(tree.to_html().contains("data-placeholder=\"loading\""));
}

#[test]
fn test_trust_badges_render_at_most_two() {
    let details = Section::new("details", SectionType::ProductDetails, 0).with_settings(
        json!({
            "trustBadges": [
                { "icon": "Truck", "title": "One", "text": "1" },
                { "icon": "ShieldCheck", "title": "Two", "text": "2" },
                { "icon": "Truck", "title": "Three", "text": "3" }
            ]
        })
        .as_object()
        .unwrap(),
    );
    let tree = render(&page("/product", vec![details]), &catalog(), Host::Storefront);

    let node = tree.section("details").unwrap();
    let badges = find_all(node, &|n| n.attr("class") == Some("trust-badge"));
    assert_eq!(badges.len(), 2);
    assert!(!node.text_content().contains("Three"));
}

#[test]
fn test_size_chart_rows() {
    let tree = render(
        &page("/product", vec![Section::new("details", SectionType::ProductDetails, 0)]),
        &catalog(),
        Host::Storefront,
    );
    let node = tree.section("details").unwrap();
    let rows = find_all(node, &|n| n.tag() == Some("tr"));
    assert_eq!(rows.len(), SIZE_CHART.len() + 1);
    assert_eq!(rows[1].text_content(), "S34\" - 36\"28\"");
    assert_eq!(rows[5].text_content(), "2XL50\" - 52\"32\"");
}

#[test]
fn test_product_details_shows_variant_price_and_sizes() {
    let tree = render(
        &page("/product", vec![Section::new("details", SectionType::ProductDetails, 0)]),
        &catalog(),
        Host::Storefront,
    );
    let node = tree.section("details").unwrap();

    let price = node.find(&|n| n.attr("data-price").is_some()).unwrap();
    assert_eq!(price.attr("data-price"), Some("10.00"));

    // Red offers S and M only; L is hidden
    let sizes: Vec<&str> = find_all(node, &|n| n.attr("data-size").is_some())
        .iter()
        .filter_map(|n| n.attr("data-size"))
        .collect();
    assert_eq!(sizes, vec!["S", "M"]);
}

#[test]
fn test_recommendations_exclude_current_product() {
    let recs = Section::new("recs", SectionType::ProductRecommendations, 0)
        .with_settings(json!({ "maxItems": 2 }).as_object().unwrap());
    let tree = render(&page("/product", vec![recs]), &catalog(), Host::Storefront);

    let node = tree.section("recs").unwrap();
    let ids: Vec<&str> = find_all(node, &|n| n.tag() == Some("article"))
        .iter()
        .filter_map(|n| n.attr("data-product-id"))
        .collect();
    assert_eq!(ids, vec!["mug", "cap"]);
}

#[test]
fn test_single_image_layout_renders_first_image() {
    let image = Section::new("img", SectionType::Image, 0).with_settings(
        json!({ "layout": "single", "images": ["a.png", { "url": "b.png" }] })
            .as_object()
            .unwrap(),
    );
    let tree = render(&page("/", vec![image]), &CatalogData::default(), Host::Storefront);

    let node = tree.section("img").unwrap();
    let srcs: Vec<&str> = find_all(node, &|n| n.tag() == Some("img"))
        .iter()
        .filter_map(|n| n.attr("src"))
        .collect();
    assert_eq!(srcs, vec!["a.png"]);
}

#[test]
fn test_custom_html_drops_scripts() {
    let html = Section::new("html", SectionType::CustomHtml, 0).with_settings(
        json!({ "html": "<p>Hello</p><script>steal()</script>" })
            .as_object()
            .unwrap(),
    );
    let tree = render(&page("/", vec![html]), &CatalogData::default(), Host::Storefront);
    let out = tree.to_html();
    assert!(out.contains("<p>Hello</p>"));
    assert!(!out.contains("steal"));
}

#[test]
fn test_bad_video_link_is_unavailable_not_fatal() {
    let video = Section::new("video", SectionType::Video, 0)
        .with_settings(json!({ "videoUrl": "not a link", "provider": "youtube" }).as_object().unwrap());
    let page = page("/", vec![video, Section::new("text", SectionType::Text, 1)]);
    let tree = render(&page, &CatalogData::default(), Host::Storefront);

    assert!(tree
        .section("video")
        .unwrap()
        .children()
        .iter()
        .any(|n| n.is_placeholder(PlaceholderKind::Unavailable)));
    assert_eq!(tree.nodes.last().unwrap().attr(SECTION_ID_ATTR), Some("text"));
}

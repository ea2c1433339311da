use super::{button, format_price, grid, heading, paragraph, product_card, ViewContext};
use crate::catalog_data::{collection_products, pick_products, ready};
use crate::error::RenderResult;
use crate::vdom::VNode;
use storefront_catalog::{Fetch, Product, VariantPriceTable, VariantResolver};
use storefront_schema::settings::{
    ListLayout, ProductCollectionSettings, ProductDetailsSettings, ProductGridSettings,
    ProductRecommendationsSettings, TrustBadge,
};
use tracing::debug;

/// Size chart rows: size, chest, length
pub const SIZE_CHART: [(&str, &str, &str); 5] = [
    ("S", "34\" - 36\"", "28\""),
    ("M", "38\" - 40\"", "29\""),
    ("L", "42\" - 44\"", "30\""),
    ("XL", "46\" - 48\"", "31\""),
    ("2XL", "50\" - 52\"", "32\""),
];

/// Reviews shown until the catalog supplies real ones: name, rating, date, text
const SAMPLE_REVIEWS: [(&str, u32, &str, &str); 3] = [
    (
        "Alex Morgan",
        5,
        "October 12, 2025",
        "The print quality is outstanding and the fabric feels premium. Would definitely recommend to anyone looking for comfort and style.",
    ),
    (
        "Priya Desai",
        4,
        "October 05, 2025",
        "Loved the colors and fit. Shipping was quick too! Slightly wish there were more pastel color options.",
    ),
    (
        "Jordan Lee",
        5,
        "September 28, 2025",
        "Fits perfectly and the size guide is accurate. The design looks even better in person. Great job!",
    ),
];

fn layout_node(layout: ListLayout, columns: u32) -> VNode {
    match layout {
        ListLayout::Grid => grid(columns),
        ListLayout::Carousel => VNode::element("div").with_class("carousel"),
        ListLayout::List => VNode::element("div").with_class("list"),
    }
}

pub(crate) fn product_grid(settings: &ProductGridSettings, ctx: &ViewContext<'_>) -> RenderResult<Vec<VNode>> {
    let title = heading("h2", &settings.heading, ctx);
    let Some(products) = ready(&ctx.data.products, "products")? else {
        return Ok(title.into_iter().chain([VNode::loading("Loading products")]).collect());
    };

    let chosen: Vec<&Product> = if settings.product_ids.is_empty() {
        products.iter().collect()
    } else {
        pick_products(products, &settings.product_ids)
    };

    let cards: Vec<VNode> = chosen
        .into_iter()
        .take(settings.max_products as usize)
        .map(|p| {
            let card = product_card(p, settings.show_price, "");
            if settings.show_add_to_cart {
                card.with_child(button("Add to cart", ctx).with_attr("data-product-id", p.id.clone()))
            } else {
                card
            }
        })
        .collect();

    let body = if cards.is_empty() {
        VNode::element("p").with_class("empty").with_child(VNode::text("No products yet"))
    } else {
        layout_node(settings.layout, settings.effective_columns()).with_children(cards)
    };

    let view_all = settings
        .show_all
        .then(|| VNode::element("a").with_attr("href", "/products").with_child(VNode::text("View all products")));

    Ok(title.into_iter().chain([body]).chain(view_all).collect())
}

pub(crate) fn product_collection(
    settings: &ProductCollectionSettings,
    ctx: &ViewContext<'_>,
) -> RenderResult<Vec<VNode>> {
    let mut nodes: Vec<VNode> = heading("h2", &settings.heading, ctx)
        .into_iter()
        .chain(paragraph(&settings.description))
        .collect();

    let Some(products) = ready(&ctx.data.products, "products")? else {
        nodes.push(VNode::loading("Loading collections"));
        return Ok(nodes);
    };

    for (index, entry) in settings.collections.iter().enumerate() {
        let cards: Vec<VNode> = collection_products(products, entry, settings.filter_by)
            .into_iter()
            .take(settings.max_products_per_collection as usize)
            .map(|p| product_card(p, settings.show_price, ""))
            .collect();

        let cover = (!entry.image_url.is_empty())
            .then(|| VNode::element("img").with_attr("src", entry.image_url.clone()).with_attr("alt", entry.name.clone()));

        nodes.push(
            VNode::element("div")
                .with_class("collection")
                .with_key(format!("collection-{}", index))
                .with_optional_child(cover)
                .with_optional_child(heading("h3", &entry.name, ctx))
                .with_child(layout_node(settings.layout, 4).with_children(cards)),
        );
    }

    Ok(nodes)
}

fn trust_badge(badge: &TrustBadge) -> VNode {
    VNode::element("div")
        .with_class("trust-badge")
        .with_attr("data-icon", badge.icon.clone())
        .with_child(VNode::element("strong").with_child(VNode::text(badge.title.clone())))
        .with_child(VNode::element("span").with_child(VNode::text(badge.text.clone())))
}

fn reviews(ctx: &ViewContext<'_>) -> VNode {
    VNode::element("div")
        .with_attr("id", "reviews")
        .with_class("reviews")
        .with_optional_child(heading("h2", "Customer reviews", ctx))
        .with_children(
            SAMPLE_REVIEWS
                .iter()
                .map(|(name, rating, date, text)| {
                    VNode::element("article")
                        .with_class("review")
                        .with_child(VNode::element("strong").with_child(VNode::text(*name)))
                        .with_child(VNode::element("span").with_child(VNode::text("★".repeat(*rating as usize))))
                        .with_child(VNode::element("time").with_child(VNode::text(*date)))
                        .with_child(VNode::element("p").with_child(VNode::text(*text)))
                })
                .collect(),
        )
}

fn size_chart(ctx: &ViewContext<'_>) -> VNode {
    let row = |cells: [&str; 3], cell_tag: &str| {
        VNode::element("tr").with_children(
            cells
                .iter()
                .map(|c| VNode::element(cell_tag).with_child(VNode::text(*c)))
                .collect(),
        )
    };

    let mut rows = vec![row(["Size", "Chest", "Length"], "th")];
    rows.extend(SIZE_CHART.iter().map(|&(size, chest, length)| row([size, chest, length], "td")));

    VNode::element("div")
        .with_attr("id", "size-chart")
        .with_class("size-chart")
        .with_optional_child(heading("h2", "Size chart", ctx))
        .with_child(VNode::element("table").with_children(rows))
}

/// Resolver for the current product; without variant data every master
/// size stays selectable at the base price.
fn resolver_for(product: &Product, variants: &Fetch<VariantResolver>) -> VariantResolver {
    match variants {
        Fetch::Ready(resolver) => resolver.clone(),
        Fetch::Pending => VariantResolver::for_product(product, VariantPriceTable::new()),
        Fetch::Failed(reason) => {
            debug!(product = %product.id, reason = %reason, "Variant pricing unavailable - using base price");
            VariantResolver::for_product(product, VariantPriceTable::new())
        }
    }
}

fn variant_picker(product: &Product, resolver: &VariantResolver) -> Vec<VNode> {
    let selection = resolver.selection();
    let selected_color = selection.color.as_deref();
    let selected_size = selection.size.as_deref();

    let colors = VNode::element("div").with_class("colors").with_children(
        product
            .master_colors()
            .iter()
            .map(|color| {
                let mut swatch = VNode::element("button")
                    .with_class("swatch")
                    .with_attr("data-color", color.clone())
                    .with_attr("aria-pressed", (Some(color.as_str()) == selected_color).to_string());
                if let Some(hex) = resolver.table().swatch(color) {
                    swatch = swatch.with_style("background-color", hex);
                }
                swatch.with_child(VNode::text(color.clone()))
            })
            .collect(),
    );

    // Sizes without a priced entry for the selected color are hidden, not disabled.
    let available = selected_color
        .map(|color| resolver.available_sizes(color))
        .unwrap_or_default();
    let sizes = VNode::element("div").with_class("sizes").with_children(
        available
            .into_iter()
            .map(|size| {
                VNode::element("button")
                    .with_class("size")
                    .with_attr("data-size", size)
                    .with_attr("aria-pressed", (Some(size) == selected_size).to_string())
                    .with_child(VNode::text(size))
            })
            .collect(),
    );

    vec![colors, sizes]
}

pub(crate) fn product_details(settings: &ProductDetailsSettings, ctx: &ViewContext<'_>) -> RenderResult<Vec<VNode>> {
    let Some(product) = ready(&ctx.data.product, "product")? else {
        return Ok(vec![VNode::loading("Loading product")]);
    };
    let resolver = resolver_for(product, &ctx.data.variants);

    let gallery = VNode::element("div").with_class("gallery").with_children(
        product
            .image_urls()
            .into_iter()
            .map(|url| VNode::element("img").with_attr("src", url).with_attr("alt", product.name.clone()))
            .collect(),
    );

    let badge = (settings.show_badge && !settings.badge_text.is_empty())
        .then(|| VNode::element("span").with_class("badge").with_child(VNode::text(settings.badge_text.clone())));

    let rating = settings.show_rating.then(|| {
        VNode::element("div").with_class("rating").with_child(VNode::text(format!(
            "★ {:.1} ({} reviews)",
            settings.rating_value, settings.rating_count
        )))
    });

    let compare_at = product
        .discount_from()
        .map(|compare| VNode::element("s").with_child(VNode::text(format_price(compare))));

    let price = VNode::element("div")
        .with_class("price")
        .with_child(
            VNode::element("strong")
                .with_attr("data-price", format!("{:.2}", resolver.active_price()))
                .with_child(VNode::text(format_price(resolver.active_price()))),
        )
        .with_optional_child(compare_at);

    let trust_badges = settings.show_trust_badges.then(|| {
        VNode::element("div")
            .with_class("trust-badges")
            .with_children(settings.rendered_trust_badges().iter().map(trust_badge).collect())
    });

    let info = VNode::element("div")
        .with_class("product-info")
        .with_optional_child(badge)
        .with_optional_child(heading("h1", &product.name, ctx))
        .with_optional_child(paragraph(&settings.tagline))
        .with_optional_child(rating)
        .with_child(price)
        .with_optional_child(paragraph(&product.description))
        .with_children(variant_picker(product, &resolver))
        .with_child(button("Add to cart", ctx).with_attr("data-product-id", product.id.clone()))
        .with_optional_child(trust_badges);

    let mut nodes = vec![VNode::element("div")
        .with_attr("id", "details")
        .with_class("product-details")
        .with_child(gallery)
        .with_child(info)];

    if settings.show_reviews {
        nodes.push(reviews(ctx));
    }
    if settings.show_size_chart {
        nodes.push(size_chart(ctx));
    }
    Ok(nodes)
}

pub(crate) fn product_recommendations(
    settings: &ProductRecommendationsSettings,
    ctx: &ViewContext<'_>,
) -> RenderResult<Vec<VNode>> {
    let mut nodes: Vec<VNode> = heading("h2", &settings.heading, ctx)
        .into_iter()
        .chain(paragraph(&settings.subheading))
        .collect();

    let Some(products) = ready(&ctx.data.products, "products")? else {
        nodes.push(VNode::loading("Loading recommendations"));
        return Ok(nodes);
    };

    let current = ctx.data.current_product_id();
    let cards: Vec<VNode> = products
        .iter()
        .filter(|p| Some(p.id.as_str()) != current)
        .take(settings.max_items as usize)
        .map(|p| product_card(p, true, "From "))
        .collect();

    if cards.is_empty() {
        nodes.push(
            VNode::element("p")
                .with_class("empty")
                .with_child(VNode::text("No similar products yet. Check back soon!")),
        );
    } else {
        let columns = if settings.layout == ListLayout::List { 1 } else { 4 };
        nodes.push(layout_node(settings.layout, columns).with_children(cards));
    }
    Ok(nodes)
}

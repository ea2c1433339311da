use super::{heading, link, ViewContext};
use crate::error::RenderResult;
use crate::vdom::VNode;
use storefront_schema::settings::{AnnouncementBarSettings, FooterSettings, HeaderSettings};

pub(crate) fn announcement_bar(
    settings: &AnnouncementBarSettings,
    _ctx: &ViewContext<'_>,
) -> RenderResult<Vec<VNode>> {
    let call_to_action = (!settings.link_label.is_empty() && !settings.link_url.is_empty())
        .then(|| link(&settings.link_url, &settings.link_label).with_class("announcement-link"));

    let dismiss = settings.show_close.then(|| {
        VNode::element("button")
            .with_attr("aria-label", "Dismiss announcement")
            .with_class("announcement-close")
            .with_child(VNode::text("×"))
    });

    Ok(vec![VNode::element("div")
        .with_class("announcement")
        .with_style("text-align", settings.alignment.as_str())
        .with_child(VNode::element("span").with_child(VNode::text(settings.message.clone())))
        .with_optional_child(call_to_action)
        .with_optional_child(dismiss)])
}

pub(crate) fn header(settings: &HeaderSettings, ctx: &ViewContext<'_>) -> RenderResult<Vec<VNode>> {
    let brand = if settings.logo.trim().is_empty() {
        VNode::element("a")
            .with_attr("href", ctx.options.home_slug.clone())
            .with_class("store-name")
            .with_style("font-family", ctx.style.heading_font.clone())
            .with_child(VNode::text(settings.store_name.clone()))
    } else {
        VNode::element("a")
            .with_attr("href", ctx.options.home_slug.clone())
            .with_child(
                VNode::element("img")
                    .with_attr("src", settings.logo.clone())
                    .with_attr("alt", settings.store_name.clone()),
            )
    };

    let nav = VNode::element("nav").with_children(
        settings
            .menu_items
            .iter()
            .map(|item| link(&item.link, &item.label))
            .collect(),
    );

    let search = settings.show_search.then(|| {
        VNode::element("input")
            .with_attr("type", "search")
            .with_attr("placeholder", "Search products")
    });

    Ok(vec![VNode::element("header")
        .with_child(brand)
        .with_child(nav)
        .with_optional_child(search)])
}

/// Header shown on storefront pages that do not define their own
pub(crate) fn store_header(ctx: &ViewContext<'_>) -> RenderResult<Vec<VNode>> {
    let mut settings = HeaderSettings::default();
    if !ctx.data.store_name.trim().is_empty() {
        settings.store_name = ctx.data.store_name.clone();
    }
    header(&settings, ctx)
}

pub(crate) fn footer(settings: &FooterSettings, ctx: &ViewContext<'_>) -> RenderResult<Vec<VNode>> {
    let columns = settings
        .sections
        .iter()
        .map(|column| {
            VNode::element("div")
                .with_class("footer-column")
                .with_optional_child(heading("h4", &column.title, ctx))
                .with_child(
                    VNode::element("ul").with_children(
                        column
                            .links
                            .iter()
                            .map(|l| VNode::element("li").with_child(link(&l.url, &l.label)))
                            .collect(),
                    ),
                )
        })
        .collect();

    let social = VNode::element("div").with_class("footer-social").with_children(
        settings
            .social_links
            .iter()
            .filter(|s| !s.url.is_empty())
            .map(|s| link(&s.url, &s.platform).with_attr("rel", "noopener"))
            .collect(),
    );

    Ok(vec![VNode::element("footer")
        .with_child(VNode::element("div").with_class("footer-columns").with_children(columns))
        .with_child(social)
        .with_child(
            VNode::element("p")
                .with_class("copyright")
                .with_child(VNode::text(settings.copyright.clone())),
        )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_data::CatalogData;
    use crate::options::ComposeOptions;
    use storefront_schema::{GlobalStyles, Section, SectionType};

    #[test]
    fn test_store_header_uses_store_name() {
        let data = CatalogData::new("Threads & Co");
        let global = GlobalStyles::default();
        let options = ComposeOptions::default();
        let style = storefront_schema::resolve_style(&global, &Section::new("h", SectionType::Header, 0));
        let ctx = ViewContext {
            section_id: "store-header",
            data: &data,
            style: &style,
            global: &global,
            options: &options,
        };

        let nodes = store_header(&ctx).unwrap();
        let text = nodes[0].text_content();
        assert!(text.starts_with("Threads & Co"));
        assert!(text.contains("Products"));
    }
}

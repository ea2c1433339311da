//! Host adapters.
//!
//! Both hosts delegate to the same [`Compositor`]; they differ only in the
//! [`Host`] they pass and in how they find the page to show.

use crate::catalog_data::CatalogData;
use crate::compositor::Compositor;
use crate::options::{ComposeOptions, Host};
use crate::vdom::RenderTree;
use storefront_schema::{Builder, Page};
use tracing::debug;

/// Authoring surface: renders the page being edited, flagging the selection.
#[derive(Debug, Clone, Default)]
pub struct CanvasHost {
    compositor: Compositor,
}

impl CanvasHost {
    pub fn new(builder: &Builder, options: ComposeOptions) -> Self {
        Self {
            compositor: Compositor::for_builder(builder, options),
        }
    }

    pub fn render(&self, page: &Page, data: &CatalogData, selected: Option<&str>) -> RenderTree {
        self.compositor.render(page, data, &Host::canvas(selected))
    }
}

/// Public storefront: resolves routes to pages.
#[derive(Debug, Clone, Default)]
pub struct StorefrontHost {
    compositor: Compositor,
}

impl StorefrontHost {
    pub fn new(builder: &Builder, options: ComposeOptions) -> Self {
        Self {
            compositor: Compositor::for_builder(builder, options),
        }
    }

    pub fn render(&self, page: &Page, data: &CatalogData) -> RenderTree {
        self.compositor.render(page, data, &Host::Storefront)
    }

    /// Render the page published under `slug`, if any
    pub fn render_route(&self, builder: &Builder, slug: &str, data: &CatalogData) -> Option<RenderTree> {
        let Some(page) = builder.page_by_slug(slug) else {
            debug!(slug, "No page for route");
            return None;
        };
        Some(self.render(page, data))
    }

    pub fn render_html(&self, page: &Page, data: &CatalogData) -> String {
        self.render(page, data).to_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vdom::SELECTED_ATTR;
    use storefront_schema::{Section, SectionType};

    fn builder() -> Builder {
        let mut builder = Builder::default();
        builder.pages[0].sections = vec![
            Section::new("header", SectionType::Header, 0),
            Section::new("hero", SectionType::Hero, 1),
        ];
        builder
    }

    #[test]
    fn test_hosts_render_the_same_sections() {
        let builder = builder();
        let page = &builder.pages[0];
        let data = CatalogData::new("Threads");

        let canvas = CanvasHost::new(&builder, ComposeOptions::default()).render(page, &data, Some("hero"));
        let storefront = StorefrontHost::new(&builder, ComposeOptions::default()).render(page, &data);

        assert_eq!(canvas.section_ids(), storefront.section_ids());
        assert_eq!(canvas.section("hero").unwrap().attr(SELECTED_ATTR), Some("true"));
        assert_eq!(
            canvas.section("hero").unwrap().children(),
            storefront.section("hero").unwrap().children()
        );
    }

    #[test]
    fn test_render_route() {
        let builder = builder();
        let host = StorefrontHost::new(&builder, ComposeOptions::default());
        let data = CatalogData::default();

        assert!(host.render_route(&builder, "/", &data).is_some());
        assert!(host.render_route(&builder, "/missing", &data).is_none());
    }
}

//! Page-level and store-wide mutations on the builder document.

use crate::mutations::MutationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use storefront_schema::{Builder, Page};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BuilderMutation {
    /// Add an empty page and make it active; the id is generated when absent
    AddPage {
        name: String,
        slug: String,
        page_id: Option<String>,
    },

    /// Remove a page; the active page falls back to the first remaining one
    RemovePage { page_id: String },

    UpdatePage {
        page_id: String,
        name: Option<String>,
        slug: Option<String>,
    },

    SetActivePage { page_id: String },

    /// Shallow merge per token
    UpdateGlobalStyles { patch: Map<String, Value> },

    SetCustomCss { css: Option<String> },
}

impl BuilderMutation {
    /// Apply to the builder, returning the page created or touched.
    pub fn apply(&self, builder: &mut Builder) -> Result<Option<String>, MutationError> {
        self.validate(builder)?;

        match self {
            BuilderMutation::AddPage { name, slug, page_id } => {
                let id = page_id.clone().unwrap_or_else(|| builder.generate_page_id());
                builder.pages.push(Page::new(id.clone(), name.clone(), slug.clone()));
                builder.active_page_id = Some(id.clone());
                Ok(Some(id))
            }

            BuilderMutation::RemovePage { page_id } => {
                builder.pages.retain(|p| &p.id != page_id);
                if builder.active_page_id.as_ref() == Some(page_id) {
                    builder.active_page_id = builder.pages.first().map(|p| p.id.clone());
                }
                Ok(Some(page_id.clone()))
            }

            BuilderMutation::UpdatePage { page_id, name, slug } => {
                let page = builder
                    .page_mut(page_id)
                    .ok_or_else(|| MutationError::PageNotFound(page_id.clone()))?;
                if let Some(name) = name {
                    page.name = name.clone();
                }
                if let Some(slug) = slug {
                    page.slug = slug.clone();
                }
                Ok(Some(page_id.clone()))
            }

            BuilderMutation::SetActivePage { page_id } => {
                builder.active_page_id = Some(page_id.clone());
                Ok(Some(page_id.clone()))
            }

            BuilderMutation::UpdateGlobalStyles { patch } => {
                builder.global_styles = builder.global_styles.merged(patch);
                Ok(None)
            }

            BuilderMutation::SetCustomCss { css } => {
                builder.custom_css = css.clone().filter(|css| !css.trim().is_empty());
                Ok(None)
            }
        }
    }

    pub fn validate(&self, builder: &Builder) -> Result<(), MutationError> {
        match self {
            BuilderMutation::AddPage { slug, page_id, .. } => {
                if builder.page_by_slug(slug).is_some() {
                    return Err(MutationError::DuplicateSlug(slug.clone()));
                }
                if let Some(id) = page_id {
                    if builder.page(id).is_some() {
                        return Err(MutationError::DuplicatePageId(id.clone()));
                    }
                }
                Ok(())
            }

            BuilderMutation::RemovePage { page_id } => {
                let page = Self::existing(builder, page_id)?;
                if page.is_system_page {
                    return Err(MutationError::SystemPage(page_id.clone()));
                }
                Ok(())
            }

            BuilderMutation::UpdatePage { page_id, slug, .. } => {
                let page = Self::existing(builder, page_id)?;
                if let Some(slug) = slug {
                    if page.is_system_page && slug != &page.slug {
                        return Err(MutationError::SystemPage(page_id.clone()));
                    }
                    if builder.pages.iter().any(|p| &p.slug == slug && &p.id != page_id) {
                        return Err(MutationError::DuplicateSlug(slug.clone()));
                    }
                }
                Ok(())
            }

            BuilderMutation::SetActivePage { page_id } => Self::existing(builder, page_id).map(|_| ()),

            BuilderMutation::UpdateGlobalStyles { .. } | BuilderMutation::SetCustomCss { .. } => Ok(()),
        }
    }

    fn existing<'a>(builder: &'a Builder, page_id: &str) -> Result<&'a Page, MutationError> {
        builder
            .page(page_id)
            .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))
    }
}

//! Store, builder and page documents.

use crate::lenient;
use crate::section::Section;
use crate::section_type::SectionType;
use crate::styles::GlobalStyles;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

pub const BUILDER_VERSION: &str = "1.0";
pub const HOME_PAGE_ID: &str = "home";
pub const HOME_SLUG: &str = "/";

/// An ordered sequence of sections bound to a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub is_system_page: bool,
    #[serde(default, deserialize_with = "page_sections")]
    pub sections: Vec<Section>,
}

impl Page {
    pub fn new(id: impl Into<String>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            is_system_page: false,
            sections: Vec::new(),
        }
    }

    /// The system home page every builder starts with
    pub fn home() -> Self {
        Self {
            is_system_page: true,
            ..Page::new(HOME_PAGE_ID, "Home", HOME_SLUG)
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Order value for a section appended after every existing one
    pub fn next_order(&self) -> f64 {
        self.sections
            .iter()
            .map(|s| s.order)
            .reduce(f64::max)
            .map_or(0.0, |max| max.floor() + 1.0)
    }

    /// Fresh `{type}-{n}` identifier not yet used on this page.
    pub fn generate_section_id(&self, section_type: &SectionType) -> String {
        let taken: HashSet<&str> = self.sections.iter().map(|s| s.id.as_str()).collect();
        let mut n = self.sections.len() + 1;
        loop {
            let candidate = format!("{}-{}", section_type.as_str(), n);
            if !taken.contains(candidate.as_str()) {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn contains_type(&self, section_type: &SectionType) -> bool {
        self.sections.iter().any(|s| &s.section_type() == section_type)
    }
}

/// Sections load one by one: an entry that is not a section document is
/// dropped, and missing or repeated ids are replaced so ids stay unique.
fn page_sections<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Section>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        warn!("Page sections are not a list - loading an empty page");
        return Ok(Vec::new());
    };

    let mut page = Page::new("", "", "");
    for (position, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Section>(item) {
            Ok(mut section) => {
                if section.id.is_empty() || page.section(&section.id).is_some() {
                    let fresh = page.generate_section_id(&section.section_type());
                    warn!(position, previous = %section.id, fresh = %fresh, "Reassigning section id");
                    section.id = fresh;
                }
                page.sections.push(section);
            }
            Err(e) => warn!(position, error = %e, "Dropping malformed section"),
        }
    }
    Ok(page.sections)
}

/// The composition state of a store: its pages plus site-wide tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Builder {
    #[serde(default = "builder_version")]
    pub version: String,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_page_id: Option<String>,
    #[serde(default)]
    pub global_styles: GlobalStyles,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_saved: Option<DateTime<Utc>>,
}

fn builder_version() -> String {
    BUILDER_VERSION.to_string()
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            version: builder_version(),
            pages: vec![Page::home()],
            active_page_id: Some(HOME_PAGE_ID.to_string()),
            global_styles: GlobalStyles::default(),
            custom_css: None,
            draft: true,
            last_saved: None,
        }
    }
}

impl Builder {
    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn page_mut(&mut self, id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    pub fn page_by_slug(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    /// The active page, or the first page when none is marked active
    pub fn active_page(&self) -> Option<&Page> {
        self.active_page_id
            .as_deref()
            .and_then(|id| self.page(id))
            .or_else(|| self.pages.first())
    }

    /// Page holding the section with `section_id`
    pub fn page_of_section(&self, section_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.section(section_id).is_some())
    }

    /// Fresh `page-{n}` identifier
    pub fn generate_page_id(&self) -> String {
        let mut n = self.pages.len() + 1;
        loop {
            let candidate = format!("page-{}", n);
            if self.page(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}

/// A store as seen by the composition core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub subdomain: String,
    #[serde(default)]
    pub use_builder: bool,
    #[serde(default)]
    pub builder: Builder,
}

impl Store {
    pub fn new(id: impl Into<String>, store_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            store_name: store_name.into(),
            subdomain: String::new(),
            use_builder: true,
            builder: Builder::default(),
        }
    }
}

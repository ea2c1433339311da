//! # Post-Effect System
//!
//! Some edits imply a second change to keep a section consistent. Effects
//! inspect a mutation after it was applied and return follow-up mutations.
//!
//! Post-effects are:
//! - **Deterministic**: Same mutation always produces same effects
//! - **One-way**: Effects never restore state an earlier effect removed

use crate::mutations::{Mutation, MutationError};
use serde_json::Value;
use storefront_schema::settings::ImageLayout;
use storefront_schema::{Page, Section, SectionSettings};
use tracing::debug;

/// Post-effect that can be triggered by a mutation
pub trait PostEffect: std::fmt::Debug + Send + Sync {
    /// Analyze the applied mutation and generate secondary mutations if needed
    fn analyze(&self, mutation: &Mutation, page: &Page) -> Vec<Mutation>;
}

/// Switching an image section to the single layout keeps only its first image.
///
/// Switching back out of single does not bring the dropped images back.
#[derive(Debug)]
pub struct CollapseSingleImageLayout;

impl CollapseSingleImageLayout {
    /// Whether a settings edit selects the single layout
    pub fn selects_single(field: &str, value: &Value) -> bool {
        field == "layout" && value.as_str() == Some("single")
    }

    /// Image count to truncate to, if the section holds more than it keeps
    pub fn truncate_to(section: &Section) -> Option<usize> {
        match &section.settings {
            SectionSettings::Image(image)
                if image.layout == ImageLayout::Single && image.images.len() > 1 =>
            {
                Some(1)
            }
            _ => None,
        }
    }
}

impl PostEffect for CollapseSingleImageLayout {
    fn analyze(&self, mutation: &Mutation, page: &Page) -> Vec<Mutation> {
        let Mutation::SetSetting { section_id, field, value } = mutation else {
            return vec![];
        };
        if !Self::selects_single(field, value) {
            return vec![];
        }
        page.section(section_id)
            .and_then(Self::truncate_to)
            .map(|len| {
                debug!(section_id = %section_id, len, "Collapsing image list for single layout");
                vec![Mutation::TruncateList {
                    section_id: section_id.clone(),
                    field: "images".to_string(),
                    len,
                }]
            })
            .unwrap_or_default()
    }
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(CollapseSingleImageLayout)],
        }
    }

    /// Analyze a mutation and generate all secondary mutations
    pub fn analyze(&self, mutation: &Mutation, page: &Page) -> Vec<Mutation> {
        self.effects
            .iter()
            .flat_map(|effect| effect.analyze(mutation, page))
            .collect()
    }

    /// Apply a mutation with all its post-effects, returning every applied
    /// mutation and the section the primary one touched.
    ///
    /// The page is only changed when every step succeeds.
    pub fn apply_with_effects(
        &self,
        mutation: Mutation,
        page: &mut Page,
    ) -> Result<(Vec<Mutation>, Option<String>), MutationError> {
        let mut working = page.clone();
        let section_id = mutation.apply(&mut working)?;
        let mut applied = vec![mutation];

        let secondary = self.analyze(&applied[0], &working);
        for secondary_mutation in secondary {
            secondary_mutation.apply(&mut working)?;
            applied.push(secondary_mutation);
        }

        *page = working;
        Ok((applied, section_id))
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storefront_schema::SectionType;

    fn image_page() -> Page {
        Page::home().with_section(
            Section::new("img", SectionType::Image, 0).with_settings(
                json!({ "layout": "grid", "images": ["a", "b", "c"] })
                    .as_object()
                    .unwrap(),
            ),
        )
    }

    fn set_layout(layout: &str) -> Mutation {
        Mutation::SetSetting {
            section_id: "img".to_string(),
            field: "layout".to_string(),
            value: json!(layout),
        }
    }

    fn urls(page: &Page) -> Vec<String> {
        match &page.section("img").unwrap().settings {
            SectionSettings::Image(image) => image.images.iter().map(|i| i.url.clone()).collect(),
            other => panic!("Expected image settings, got {:?}", other),
        }
    }

    #[test]
    fn test_single_layout_truncates_images() {
        let mut page = image_page();
        let engine = PostEffectEngine::new();
        let (applied, _) = engine.apply_with_effects(set_layout("single"), &mut page).unwrap();
        assert_eq!(applied.len(), 2);
        assert_eq!(urls(&page), vec!["a"]);
    }

    #[test]
    fn test_truncation_is_not_reversed() {
        let mut page = image_page();
        let engine = PostEffectEngine::new();
        engine.apply_with_effects(set_layout("single"), &mut page).unwrap();
        let (applied, _) = engine.apply_with_effects(set_layout("grid"), &mut page).unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(urls(&page), vec!["a"]);
    }

    #[test]
    fn test_other_fields_trigger_nothing() {
        let page = image_page();
        let mutation = Mutation::SetSetting {
            section_id: "img".to_string(),
            field: "caption".to_string(),
            value: json!("single"),
        };
        assert!(PostEffectEngine::new().analyze(&mutation, &page).is_empty());
    }

    #[test]
    fn test_failed_mutation_leaves_page_untouched() {
        let mut page = image_page();
        let before = page.clone();
        let result = PostEffectEngine::new().apply_with_effects(set_layout("mosaic"), &mut page);
        assert!(result.is_err());
        assert_eq!(page, before);
    }
}

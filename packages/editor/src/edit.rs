//! Pure section editing.

use crate::post_effects::CollapseSingleImageLayout;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use storefront_schema::{Section, SectionStyles};
use tracing::{debug, instrument};

/// Field-scoped patch for one section, in document shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl SectionPatch {
    pub fn settings(patch: Map<String, Value>) -> Self {
        Self {
            settings: Some(patch),
            ..Self::default()
        }
    }

    pub fn styles(patch: Map<String, Value>) -> Self {
        Self {
            styles: Some(patch),
            ..Self::default()
        }
    }

    /// The fields that differ between two versions of one section.
    ///
    /// Padding and margin are compared per side, so the patch names only
    /// the sides that changed. Applying the result to `before` yields `after`.
    pub fn between(before: &Section, after: &Section) -> Self {
        let settings = changed_fields(&before.settings.to_map(), &after.settings.to_map(), &[]);
        let styles = changed_fields(
            &style_map(&before.styles),
            &style_map(&after.styles),
            &["padding", "margin"],
        );

        Self {
            settings: (!settings.is_empty()).then_some(settings),
            styles: (!styles.is_empty()).then_some(styles),
            visible: (before.visible != after.visible).then_some(after.visible),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_none() && self.styles.is_none() && self.visible.is_none()
    }

    /// Top-level field names the patch touches
    pub fn field_names(&self) -> Vec<&str> {
        let settings = self.settings.iter().flat_map(|m| m.keys());
        let styles = self.styles.iter().flat_map(|m| m.keys());
        let mut names: Vec<&str> = settings.chain(styles).map(String::as_str).collect();
        if self.visible.is_some() {
            names.push("visible");
        }
        names
    }
}

fn style_map(styles: &SectionStyles) -> Map<String, Value> {
    match serde_json::to_value(styles) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Keys of `after` whose value differs from `before`; keys only `before`
/// has come back as null. Keys listed in `nested` recurse one level.
fn changed_fields(before: &Map<String, Value>, after: &Map<String, Value>, nested: &[&str]) -> Map<String, Value> {
    let mut changed = Map::new();
    for (key, value) in after {
        match (before.get(key), value) {
            (Some(prev), _) if prev == value => {}
            (Some(Value::Object(prev)), Value::Object(next)) if nested.contains(&key.as_str()) => {
                let sides = changed_fields(prev, next, &[]);
                if !sides.is_empty() {
                    changed.insert(key.clone(), Value::Object(sides));
                }
            }
            _ => {
                changed.insert(key.clone(), value.clone());
            }
        }
    }
    for key in before.keys() {
        if !after.contains_key(key) {
            changed.insert(key.clone(), Value::Null);
        }
    }
    changed
}

/// Apply a patch to a section and return the edited copy.
///
/// Every key is a shallow merge: fields the patch does not name keep their
/// value, and a value that does not fit its field is dropped while the
/// prior value stays.
#[instrument(skip(section, patch), fields(section_id = %section.id))]
pub fn edit_section(section: &Section, patch: &SectionPatch) -> Section {
    let mut next = section.clone();

    if let Some(settings) = &patch.settings {
        next.settings = next.settings.merged(settings);

        let selects_single = settings
            .iter()
            .any(|(field, value)| CollapseSingleImageLayout::selects_single(field, value));
        if selects_single {
            if let Some(len) = CollapseSingleImageLayout::truncate_to(&next) {
                next.settings = collapse_images(&next, len);
            }
        }
    }

    if let Some(styles) = &patch.styles {
        next.styles = next.styles.merged(styles);
    }

    if let Some(visible) = patch.visible {
        next.visible = visible;
    }

    next
}

fn collapse_images(section: &Section, len: usize) -> storefront_schema::SectionSettings {
    let truncated = section.settings.list_entries("images").and_then(|(_, mut entries)| {
        entries.truncate(len);
        section.settings.with_list("images", entries)
    });
    match truncated {
        Ok(settings) => settings,
        Err(e) => {
            debug!(error = %e, "Image list could not be collapsed");
            section.settings.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storefront_schema::{SectionSettings, SectionType};

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_settings_patch_is_shallow() {
        let section = Section::new("hero", SectionType::Hero, 0)
            .with_settings(&obj(json!({ "heading": "Old", "subheading": "Keep" })));
        let edited = edit_section(&section, &SectionPatch::settings(obj(json!({ "heading": "Hi" }))));

        let before = section.settings.to_map();
        let after = edited.settings.to_map();
        assert_eq!(after["heading"], json!("Hi"));
        for (key, value) in &before {
            if key != "heading" {
                assert_eq!(after.get(key), Some(value), "{} changed", key);
            }
        }
    }

    #[test]
    fn test_non_numeric_input_keeps_prior_value() {
        let section = Section::new("grid", SectionType::ProductGrid, 0)
            .with_settings(&obj(json!({ "maxProducts": 6 })));
        let edited = edit_section(
            &section,
            &SectionPatch::settings(obj(json!({ "maxProducts": "six" }))),
        );
        assert_eq!(edited, section);
    }

    #[test]
    fn test_single_layout_patch_collapses_images() {
        let section = Section::new("img", SectionType::Image, 0)
            .with_settings(&obj(json!({ "layout": "grid", "images": ["a", "b", "c"] })));
        let single = edit_section(&section, &SectionPatch::settings(obj(json!({ "layout": "single" }))));
        let back = edit_section(&single, &SectionPatch::settings(obj(json!({ "layout": "grid" }))));

        match &back.settings {
            SectionSettings::Image(image) => {
                let urls: Vec<&str> = image.images.iter().map(|i| i.url.as_str()).collect();
                assert_eq!(urls, vec!["a"]);
            }
            other => panic!("Expected image settings, got {:?}", other),
        }
    }

    #[test]
    fn test_style_and_visibility_patch() {
        let section = Section::new("t", SectionType::Text, 0);
        let patch = SectionPatch {
            styles: Some(obj(json!({ "padding": { "top": 10 } }))),
            visible: Some(false),
            ..SectionPatch::default()
        };
        let edited = edit_section(&section, &patch);
        let padding = edited.styles.padding.unwrap();
        assert_eq!(padding.top, Some(10.0));
        assert_eq!(padding.bottom, section.styles.padding.unwrap().bottom);
        assert!(!edited.visible);
    }

    #[test]
    fn test_between_names_only_changed_fields() {
        let before = Section::new("hero", SectionType::Hero, 0);
        let after = edit_section(
            &before,
            &SectionPatch {
                settings: Some(obj(json!({ "heading": "Hi" }))),
                styles: Some(obj(json!({ "padding": { "left": 12 } }))),
                visible: None,
            },
        );

        let patch = SectionPatch::between(&before, &after);
        assert_eq!(patch.settings, Some(obj(json!({ "heading": "Hi" }))));
        assert_eq!(patch.styles, Some(obj(json!({ "padding": { "left": 12.0 } }))));
        assert_eq!(patch.visible, None);
        assert_eq!(edit_section(&before, &patch), after);

        assert!(SectionPatch::between(&after, &after).is_empty());
    }

    #[test]
    fn test_between_carries_cleared_style_as_null() {
        let before = Section::new("hero", SectionType::Hero, 0);
        let after = edit_section(&before, &SectionPatch::styles(obj(json!({ "backgroundColor": "" }))));
        assert!(after.styles.background_color.is_none());

        let patch = SectionPatch::between(&before, &after);
        assert_eq!(patch.styles, Some(obj(json!({ "backgroundColor": null }))));
        assert_eq!(edit_section(&before, &patch), after);
    }
}

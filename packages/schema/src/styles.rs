//! # Style Resolver
//!
//! Merges the store's global style tokens with a section's own overrides
//! into one concrete [`ResolvedStyle`].
//!
//! ## Cascade
//!
//! ```text
//! GlobalStyles (site tokens)
//!        ↓
//! SectionStyles (per-section overrides, every field optional)
//!        ↓
//! ResolvedStyle (every field concrete)
//! ```
//!
//! Text alignment has its own chain: `styles.textAlign` → `settings.alignment`
//! → the section type's default. Padding and margin resolve per side: an unset
//! side takes its own default (32 for padding, 0 for margin) whatever the
//! other sides hold.

use crate::error::{SchemaError, SchemaResult};
use crate::lenient::{self, number_from};
use crate::section::Section;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

pub const DEFAULT_PADDING: f64 = 32.0;
pub const DEFAULT_MARGIN: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            _ => None,
        }
    }
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Side::Top),
            "right" => Some(Side::Right),
            "bottom" => Some(Side::Bottom),
            "left" => Some(Side::Left),
            _ => None,
        }
    }
}

/// Box sides as stored on a section; each side is optional on its own.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialSides {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub left: Option<f64>,
}

impl PartialSides {
    pub fn all_sides(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
            left: Some(left),
        }
    }

    pub fn get(&self, side: Side) -> Option<f64> {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub fn set(&mut self, side: Side, value: f64) {
        let slot = match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        };
        *slot = Some(value);
    }

    /// Fill every unset side with `default`, independently.
    pub fn resolve(&self, default: f64) -> Sides {
        Sides {
            top: self.top.unwrap_or(default),
            right: self.right.unwrap_or(default),
            bottom: self.bottom.unwrap_or(default),
            left: self.left.unwrap_or(default),
        }
    }
}

/// Fully resolved box sides
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Per-section presentation overrides
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStyles {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub max_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub padding: Option<PartialSides>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub margin: Option<PartialSides>,
}

/// One editable style field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "field", content = "side")]
pub enum StyleField {
    BackgroundColor,
    BackgroundImage,
    TextAlign,
    MaxWidth,
    BorderRadius,
    Padding(Side),
    Margin(Side),
}

impl StyleField {
    /// Non-side fields by document name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "backgroundColor" => Some(StyleField::BackgroundColor),
            "backgroundImage" => Some(StyleField::BackgroundImage),
            "textAlign" => Some(StyleField::TextAlign),
            "maxWidth" => Some(StyleField::MaxWidth),
            "borderRadius" => Some(StyleField::BorderRadius),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StyleField::BackgroundColor => "backgroundColor",
            StyleField::BackgroundImage => "backgroundImage",
            StyleField::TextAlign => "textAlign",
            StyleField::MaxWidth => "maxWidth",
            StyleField::BorderRadius => "borderRadius",
            StyleField::Padding(_) => "padding",
            StyleField::Margin(_) => "margin",
        }
    }
}

impl SectionStyles {
    /// Returns a copy with one field replaced; every other field is kept.
    ///
    /// Text fields given an empty string are cleared so the cascade default
    /// applies again. Numeric sides reject anything that does not parse.
    pub fn with_field(&self, field: StyleField, input: &Value) -> SchemaResult<SectionStyles> {
        let mut next = self.clone();
        match field {
            StyleField::BackgroundColor => next.background_color = text_input(field, input)?,
            StyleField::BackgroundImage => next.background_image = text_input(field, input)?,
            StyleField::MaxWidth => next.max_width = text_input(field, input)?,
            StyleField::BorderRadius => next.border_radius = text_input(field, input)?,
            StyleField::TextAlign => {
                next.text_align = match text_input(field, input)? {
                    None => None,
                    Some(raw) => Some(TextAlign::parse(&raw).ok_or_else(|| {
                        SchemaError::invalid_input("textAlign", format!("'{}' is not an alignment", raw))
                    })?),
                };
            }
            StyleField::Padding(side) => {
                let value = side_input("padding", input)?;
                next.padding.get_or_insert_with(PartialSides::default).set(side, value);
            }
            StyleField::Margin(side) => {
                let value = side_input("margin", input)?;
                next.margin.get_or_insert_with(PartialSides::default).set(side, value);
            }
        }
        Ok(next)
    }

    /// Shallow merge of a style patch given in document shape.
    ///
    /// Padding and margin merge per side. A value that does not fit keeps
    /// the prior one; the rest of the patch still applies.
    pub fn merged(&self, patch: &Map<String, Value>) -> SectionStyles {
        let mut next = self.clone();
        for (key, value) in patch {
            let fields: Vec<(StyleField, &Value)> = match (key.as_str(), value) {
                ("padding", Value::Object(sides)) => side_fields(sides, StyleField::Padding),
                ("margin", Value::Object(sides)) => side_fields(sides, StyleField::Margin),
                _ => match StyleField::from_name(key) {
                    Some(field) => vec![(field, value)],
                    None => {
                        debug!(field = %key, "Ignoring unknown style field");
                        Vec::new()
                    }
                },
            };
            for (field, input) in fields {
                match next.with_field(field, input) {
                    Ok(updated) => next = updated,
                    Err(e) => debug!(field = field.name(), error = %e, "Rejected style field"),
                }
            }
        }
        next
    }
}

fn side_fields(sides: &Map<String, Value>, field: fn(Side) -> StyleField) -> Vec<(StyleField, &Value)> {
    sides
        .iter()
        .filter_map(|(name, value)| Side::parse(name).map(|side| (field(side), value)))
        .collect()
}

fn text_input(field: StyleField, input: &Value) -> SchemaResult<Option<String>> {
    match input {
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Null => Ok(None),
        other => Err(SchemaError::invalid_input(
            field.name(),
            format!("expected text, got {}", other),
        )),
    }
}

fn side_input(field: &str, input: &Value) -> SchemaResult<f64> {
    number_from(input)
        .ok_or_else(|| SchemaError::invalid_input(field, format!("'{}' is not a number", input)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Rounded,
    Square,
    Pill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    #[default]
    Elevated,
    Flat,
    Bordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Compact,
    #[default]
    Normal,
    Relaxed,
}

/// Site-wide typography and colour tokens, defined once per store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStyles {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub heading_font: String,
    pub body_font: String,
    pub button_style: ButtonStyle,
    pub card_style: CardStyle,
    pub spacing: Spacing,
}

impl Default for GlobalStyles {
    fn default() -> Self {
        Self {
            primary_color: "#2563eb".to_string(),
            secondary_color: "#64748b".to_string(),
            accent_color: "#f59e0b".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#1e293b".to_string(),
            heading_font: "Inter, sans-serif".to_string(),
            body_font: "Inter, sans-serif".to_string(),
            button_style: ButtonStyle::default(),
            card_style: CardStyle::default(),
            spacing: Spacing::default(),
        }
    }
}

impl<'de> Deserialize<'de> for GlobalStyles {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Object(tokens) => GlobalStyles::default().merged(&tokens),
            _ => GlobalStyles::default(),
        })
    }
}

impl GlobalStyles {
    /// Shallow merge per token; tokens absent from the patch, or present
    /// with the wrong shape, keep their current value.
    pub fn merged(&self, patch: &Map<String, Value>) -> GlobalStyles {
        let mut next = self.clone();
        for (key, value) in patch {
            let applied = match key.as_str() {
                "primaryColor" => set_token(&mut next.primary_color, value),
                "secondaryColor" => set_token(&mut next.secondary_color, value),
                "accentColor" => set_token(&mut next.accent_color, value),
                "backgroundColor" => set_token(&mut next.background_color, value),
                "textColor" => set_token(&mut next.text_color, value),
                "headingFont" => set_token(&mut next.heading_font, value),
                "bodyFont" => set_token(&mut next.body_font, value),
                "buttonStyle" => set_token(&mut next.button_style, value),
                "cardStyle" => set_token(&mut next.card_style, value),
                "spacing" => set_token(&mut next.spacing, value),
                _ => {
                    debug!(token = %key, "Ignoring unknown global style token");
                    true
                }
            };
            if !applied {
                warn!(token = %key, value = %value, "Schema mismatch in global styles - keeping previous token");
            }
        }
        next
    }
}

fn set_token<T: DeserializeOwned>(slot: &mut T, value: &Value) -> bool {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => {
            *slot = parsed;
            true
        }
        Err(_) => false,
    }
}

/// Concrete presentation values for one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub background_color: String,
    pub background_image: Option<String>,
    pub text_align: TextAlign,
    pub max_width: String,
    pub border_radius: Option<String>,
    pub padding: Sides,
    pub margin: Sides,
    pub text_color: String,
    pub font_family: String,
    pub heading_font: String,
    pub accent_color: String,
}

impl ResolvedStyle {
    /// CSS declarations, keyed by property name
    pub fn to_css(&self) -> BTreeMap<String, String> {
        let mut css = BTreeMap::new();
        css.insert("background-color".to_string(), self.background_color.clone());
        if let Some(image) = &self.background_image {
            css.insert("background-image".to_string(), format!("url({})", image));
        }
        css.insert("text-align".to_string(), self.text_align.to_string());
        css.insert("max-width".to_string(), self.max_width.clone());
        if let Some(radius) = &self.border_radius {
            css.insert("border-radius".to_string(), radius.clone());
        }
        css.insert("padding".to_string(), self.padding.to_css());
        css.insert("margin".to_string(), self.margin.to_css());
        css.insert("color".to_string(), self.text_color.clone());
        css.insert("font-family".to_string(), self.font_family.clone());
        css
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Resolve one section's presentation against the store tokens.
pub fn resolve_style(global: &GlobalStyles, section: &Section) -> ResolvedStyle {
    let styles = &section.styles;

    let text_align = styles
        .text_align
        .or_else(|| section.settings.alignment())
        .unwrap_or_else(|| section.section_type().default_text_align());

    let background_image =
        non_empty(&styles.background_image).or_else(|| section.settings.background_image());

    ResolvedStyle {
        background_color: non_empty(&styles.background_color)
            .unwrap_or_else(|| global.background_color.clone()),
        background_image,
        text_align,
        max_width: non_empty(&styles.max_width).unwrap_or_else(|| "100%".to_string()),
        border_radius: non_empty(&styles.border_radius),
        padding: styles
            .padding
            .map(|p| p.resolve(DEFAULT_PADDING))
            .unwrap_or_else(|| Sides::uniform(DEFAULT_PADDING)),
        margin: styles
            .margin
            .map(|m| m.resolve(DEFAULT_MARGIN))
            .unwrap_or_else(|| Sides::uniform(DEFAULT_MARGIN)),
        text_color: global.text_color.clone(),
        font_family: global.body_font.clone(),
        heading_font: global.heading_font.clone(),
        accent_color: global.primary_color.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Section;
    use crate::section_type::SectionType;
    use serde_json::json;

    fn bare(section_type: SectionType) -> Section {
        let mut section = Section::new("s-1", section_type, 0);
        section.styles = SectionStyles::default();
        section
    }

    #[test]
    fn test_padding_defaults_to_32_on_every_side() {
        let resolved = resolve_style(&GlobalStyles::default(), &bare(SectionType::Text));
        assert_eq!(resolved.padding, Sides::uniform(32.0));
        assert_eq!(resolved.margin, Sides::uniform(0.0));
    }

    #[test]
    fn test_single_padding_side_leaves_others_defaulted() {
        let mut section = bare(SectionType::Text);
        section.styles.padding = Some(PartialSides {
            top: Some(10.0),
            ..PartialSides::default()
        });
        let resolved = resolve_style(&GlobalStyles::default(), &section);
        assert_eq!(
            resolved.padding,
            Sides {
                top: 10.0,
                right: 32.0,
                bottom: 32.0,
                left: 32.0
            }
        );
    }

    #[test]
    fn test_single_margin_side_leaves_others_zero() {
        let mut section = bare(SectionType::Text);
        section.styles.margin = Some(PartialSides {
            left: Some(8.0),
            ..PartialSides::default()
        });
        let resolved = resolve_style(&GlobalStyles::default(), &section);
        assert_eq!(resolved.margin.to_css(), "0px 0px 0px 8px");
    }

    #[test]
    fn test_text_align_fallback_chain() {
        let globals = GlobalStyles::default();

        // type default
        let hero = bare(SectionType::Hero);
        let mut hero_settings = hero.clone();
        hero_settings.settings = hero_settings
            .settings
            .with_field("alignment", &json!("right"))
            .unwrap();
        assert_eq!(resolve_style(&globals, &bare(SectionType::Video)).text_align, TextAlign::Left);

        // settings.alignment beats the type default
        assert_eq!(resolve_style(&globals, &hero_settings).text_align, TextAlign::Right);

        // styles.textAlign beats settings.alignment
        let mut styled = hero_settings.clone();
        styled.styles.text_align = Some(TextAlign::Left);
        assert_eq!(resolve_style(&globals, &styled).text_align, TextAlign::Left);
    }

    #[test]
    fn test_empty_overrides_fall_back() {
        let mut section = bare(SectionType::Text);
        section.styles.background_color = Some(String::new());
        section.styles.max_width = Some("  ".to_string());
        let resolved = resolve_style(&GlobalStyles::default(), &section);
        assert_eq!(resolved.background_color, "#ffffff");
        assert_eq!(resolved.max_width, "100%");
    }

    #[test]
    fn test_unset_background_uses_store_token() {
        let globals = GlobalStyles::default().merged(
            json!({ "backgroundColor": "#fafaf9" }).as_object().unwrap(),
        );
        let resolved = resolve_style(&globals, &bare(SectionType::Text));
        assert_eq!(resolved.background_color, "#fafaf9");

        let mut own = bare(SectionType::Text);
        own.styles.background_color = Some("#000000".to_string());
        assert_eq!(resolve_style(&globals, &own).background_color, "#000000");
    }

    #[test]
    fn test_global_tokens_flow_into_resolved_style() {
        let globals = GlobalStyles::default().merged(
            json!({ "textColor": "#111111", "bodyFont": "Georgia, serif" })
                .as_object()
                .unwrap(),
        );
        let resolved = resolve_style(&globals, &bare(SectionType::Text));
        assert_eq!(resolved.text_color, "#111111");
        assert_eq!(resolved.font_family, "Georgia, serif");
        assert_eq!(resolved.accent_color, "#2563eb");
    }

    #[test]
    fn test_style_field_rejects_unparsable_padding() {
        let styles = SectionStyles {
            padding: Some(PartialSides {
                top: Some(12.0),
                ..PartialSides::default()
            }),
            ..SectionStyles::default()
        };
        let result = styles.with_field(StyleField::Padding(Side::Top), &json!("twelve"));
        assert!(matches!(result, Err(SchemaError::InvalidFieldInput { .. })));
    }

    #[test]
    fn test_style_field_sets_one_side_only() {
        let styles = SectionStyles::default()
            .with_field(StyleField::Padding(Side::Bottom), &json!("24"))
            .unwrap();
        let padding = styles.padding.unwrap();
        assert_eq!(padding.bottom, Some(24.0));
        assert_eq!(padding.top, None);
    }

    #[test]
    fn test_mismatched_style_fields_recover() {
        let styles: SectionStyles = serde_json::from_value(json!({
            "backgroundColor": "#fff",
            "textAlign": "justify",
            "padding": { "top": "oops", "left": 4 }
        }))
        .unwrap();
        assert_eq!(styles.background_color.as_deref(), Some("#fff"));
        assert_eq!(styles.text_align, None);
        let padding = styles.padding.unwrap();
        assert_eq!(padding.top, None);
        assert_eq!(padding.left, Some(4.0));
    }

    #[test]
    fn test_partial_global_styles_default_per_token() {
        let globals: GlobalStyles =
            serde_json::from_value(json!({ "primaryColor": "#000000", "buttonStyle": "weird" }))
                .unwrap();
        assert_eq!(globals.primary_color, "#000000");
        assert_eq!(globals.secondary_color, "#64748b");
        assert_eq!(globals.button_style, ButtonStyle::Rounded);
    }

    #[test]
    fn test_merged_padding_keeps_other_sides_and_rejects_garbage() {
        let styles = SectionStyles {
            padding: Some(PartialSides::all_sides(10.0, 20.0, 30.0, 40.0)),
            ..SectionStyles::default()
        };
        let merged = styles.merged(
            json!({ "padding": { "top": 5, "left": "wide" }, "maxWidth": "960px" })
                .as_object()
                .unwrap(),
        );
        assert_eq!(merged.padding, Some(PartialSides::all_sides(5.0, 20.0, 30.0, 40.0)));
        assert_eq!(merged.max_width.as_deref(), Some("960px"));
    }
}

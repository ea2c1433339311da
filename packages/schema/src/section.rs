//! Section documents.

use crate::lenient::{self, number_from};
use crate::section_type::SectionType;
use crate::settings::SectionSettings;
use crate::styles::SectionStyles;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

/// One block of page content.
///
/// The section type is carried by the settings variant, so a section can
/// never hold settings of another type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SectionDocument", into = "SectionDocument")]
pub struct Section {
    pub id: String,
    /// Ascending render position; ties keep document order
    pub order: f64,
    pub visible: bool,
    pub settings: SectionSettings,
    pub styles: SectionStyles,
}

impl Section {
    /// A visible section with type defaults for settings and styles.
    pub fn new(id: impl Into<String>, section_type: SectionType, order: impl Into<f64>) -> Self {
        Self {
            id: id.into(),
            order: order.into(),
            visible: true,
            styles: section_type.default_styles(),
            settings: SectionSettings::defaults(&section_type),
        }
    }

    pub fn section_type(&self) -> SectionType {
        self.settings.section_type()
    }

    pub fn with_settings(mut self, patch: &Map<String, Value>) -> Self {
        self.settings = self.settings.merged(patch);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Persisted shape of a section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDocument {
    #[serde(default, deserialize_with = "lenient::or_default")]
    id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::or_default")]
    section_type: String,
    #[serde(default, deserialize_with = "order_number", serialize_with = "order_value")]
    order: f64,
    #[serde(default = "shown", deserialize_with = "unless_false")]
    visible: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    settings: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    styles: SectionStyles,
}

fn shown() -> bool {
    true
}

/// Only an explicit `false` hides a section.
fn unless_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value != Value::Bool(false))
}

fn order_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match number_from(&value) {
        Some(n) if n.is_finite() => Ok(n),
        _ => {
            warn!(value = %value, "Section order is not a number - using 0");
            Ok(0.0)
        }
    }
}

/// Whole orders are written back as integers.
fn order_value<S: Serializer>(order: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if order.fract() == 0.0 && order.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*order as i64)
    } else {
        serializer.serialize_f64(*order)
    }
}

impl From<SectionDocument> for Section {
    fn from(doc: SectionDocument) -> Self {
        let section_type = SectionType::parse(&doc.section_type);
        if !section_type.is_known() {
            warn!(section_id = %doc.id, section_type = %section_type, "Unknown section type");
        }
        Section {
            settings: SectionSettings::defaulted(&section_type, &doc.settings),
            id: doc.id,
            order: doc.order,
            visible: doc.visible,
            styles: doc.styles,
        }
    }
}

impl From<Section> for SectionDocument {
    fn from(section: Section) -> Self {
        SectionDocument {
            section_type: section.section_type().as_str().to_string(),
            settings: section.settings.to_map(),
            id: section.id,
            order: section.order,
            visible: section.visible,
            styles: section.styles,
        }
    }
}

//! # Settings Editor
//!
//! Schema-driven editing of the selected section. The editor describes
//! what can be edited ([`SettingsPanel`]) and turns each edit into a
//! field-scoped [`Mutation`] applied through the session.

use crate::errors::EditorError;
use crate::mutations::{Mutation, MutationResult};
use crate::session::EditSession;
use serde::Serialize;
use serde_json::Value;
use storefront_schema::{
    Direction, FieldKind, FieldSpec, ListSpec, Section, SectionStyles, SectionType, StyleField,
};

/// Editor bound to a session's current selection; every operation fails
/// with [`EditorError::NoSelection`] while nothing is selected.
pub struct SettingsEditor<'a> {
    session: &'a mut EditSession,
}

impl<'a> SettingsEditor<'a> {
    pub fn new(session: &'a mut EditSession) -> Self {
        Self { session }
    }

    pub fn section(&self) -> Option<&Section> {
        self.session.selected()
    }

    /// Editable surface of the selected section
    pub fn panel(&self) -> Option<SettingsPanel> {
        self.section().map(SettingsPanel::for_section)
    }

    fn selected_id(&self) -> Result<String, EditorError> {
        self.session
            .selected_id()
            .map(str::to_string)
            .ok_or(EditorError::NoSelection)
    }

    pub fn update_setting(&mut self, field: &str, value: Value) -> Result<MutationResult, EditorError> {
        let section_id = self.selected_id()?;
        self.session.apply(Mutation::SetSetting {
            section_id,
            field: field.to_string(),
            value,
        })
    }

    pub fn update_style(&mut self, field: StyleField, value: Value) -> Result<MutationResult, EditorError> {
        let section_id = self.selected_id()?;
        self.session.apply(Mutation::SetStyle { section_id, field, value })
    }

    pub fn append_entry(&mut self, field: &str) -> Result<MutationResult, EditorError> {
        let section_id = self.selected_id()?;
        self.session.apply(Mutation::AppendListEntry {
            section_id,
            field: field.to_string(),
        })
    }

    pub fn update_entry(
        &mut self,
        field: &str,
        index: usize,
        entry_field: &str,
        value: Value,
    ) -> Result<MutationResult, EditorError> {
        let section_id = self.selected_id()?;
        self.session.apply(Mutation::UpdateListEntry {
            section_id,
            field: field.to_string(),
            index,
            entry_field: entry_field.to_string(),
            value,
        })
    }

    pub fn remove_entry(&mut self, field: &str, index: usize) -> Result<MutationResult, EditorError> {
        let section_id = self.selected_id()?;
        self.session.apply(Mutation::RemoveListEntry {
            section_id,
            field: field.to_string(),
            index,
        })
    }

    /// Swap an image with its neighbour
    pub fn move_image(&mut self, index: usize, direction: Direction) -> Result<MutationResult, EditorError> {
        let section_id = self.selected_id()?;
        self.session.apply(Mutation::MoveListEntry {
            section_id,
            field: "images".to_string(),
            index,
            direction,
        })
    }

    pub fn toggle_visible(&mut self) -> Result<MutationResult, EditorError> {
        let section_id = self.selected_id()?;
        self.session.apply(Mutation::ToggleVisibility { section_id })
    }

    pub fn remove(&mut self) -> Result<MutationResult, EditorError> {
        let section_id = self.selected_id()?;
        self.session.apply(Mutation::RemoveSection { section_id })
    }

    pub fn duplicate(&mut self) -> Result<MutationResult, EditorError> {
        let section_id = self.selected_id()?;
        self.session.apply(Mutation::DuplicateSection {
            section_id,
            new_id: None,
        })
    }
}

/// Describes the editing surface of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPanel {
    pub section_id: String,
    pub section_type: SectionType,
    pub title: String,
    pub visible: bool,
    /// Empty for unknown section types
    pub fields: Vec<PanelField>,
    pub styles: SectionStyles,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<PanelList>,
}

/// Entries offered for editing and which list operations apply
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelList {
    pub entries: Vec<Value>,
    pub entry_fields: Vec<&'static str>,
    pub can_append: bool,
    pub can_remove: bool,
    pub can_swap: bool,
}

impl SettingsPanel {
    pub fn for_section(section: &Section) -> Self {
        let current = section.settings.to_map();
        let fields = section
            .settings
            .editable_fields()
            .into_iter()
            .map(|spec| PanelField::new(spec, current.get(spec.name).cloned().unwrap_or(Value::Null), &current))
            .collect();

        Self {
            section_id: section.id.clone(),
            section_type: section.section_type(),
            title: section.section_type().display_name().to_string(),
            visible: section.visible,
            fields,
            styles: section.styles.clone(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&PanelField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl PanelField {
    fn new(spec: &FieldSpec, value: Value, settings: &serde_json::Map<String, Value>) -> Self {
        let options = match spec.kind {
            FieldKind::Select(options) => Some(options.to_vec()),
            _ => None,
        };
        let list = spec
            .list_spec()
            .map(|list_spec| PanelList::new(list_spec, &value, settings));

        Self {
            name: spec.name,
            label: spec.label,
            kind: spec.kind.describe(),
            value,
            options,
            list,
        }
    }
}

impl PanelList {
    fn new(spec: &ListSpec, value: &Value, settings: &serde_json::Map<String, Value>) -> Self {
        let mut entries = value.as_array().cloned().unwrap_or_default();
        if let Some(max) = spec.max_editable {
            entries.truncate(max);
        }
        Self {
            entries,
            entry_fields: spec
                .entry
                .iter()
                .filter(|f| f.is_shown(settings))
                .map(|f| f.name)
                .collect(),
            can_append: spec.appendable,
            can_remove: spec.appendable,
            can_swap: spec.swappable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storefront_schema::Builder;

    fn session_with(section: Section) -> EditSession {
        let mut builder = Builder::default();
        builder.pages[0].sections.push(section);
        EditSession::new("client-1", "store-1", builder)
    }

    #[test]
    fn test_no_selection_rejects_edits() {
        let mut session = session_with(Section::new("t", SectionType::Text, 0));
        let mut editor = session.editor();
        assert!(editor.panel().is_none());
        assert!(matches!(
            editor.update_setting("heading", json!("Hi")),
            Err(EditorError::NoSelection)
        ));
    }

    #[test]
    fn test_panel_hides_columns_outside_grid() {
        let section = Section::new("g", SectionType::ProductGrid, 0)
            .with_settings(json!({ "layout": "list" }).as_object().unwrap());
        let panel = SettingsPanel::for_section(&section);
        assert!(panel.field("columns").is_none());
        assert!(panel.field("maxProducts").is_some());
        assert_eq!(
            panel.field("layout").unwrap().options.as_deref(),
            Some(&["grid", "carousel", "list"][..])
        );
    }

    #[test]
    fn test_panel_offers_two_trust_badges() {
        let section = Section::new("pd", SectionType::ProductDetails, 0).with_settings(
            json!({ "trustBadges": [{ "title": "a" }, { "title": "b" }, { "title": "c" }] })
                .as_object()
                .unwrap(),
        );
        let panel = SettingsPanel::for_section(&section);
        let list = panel.field("trustBadges").unwrap().list.as_ref().unwrap();
        assert_eq!(list.entries.len(), 2);
        assert!(!list.can_append);
    }

    #[test]
    fn test_unknown_type_has_empty_panel() {
        let section: Section = serde_json::from_value(json!({
            "id": "x", "type": "countdown", "order": 0, "settings": { "endsAt": "soon" }
        }))
        .unwrap();
        let panel = SettingsPanel::for_section(&section);
        assert!(panel.fields.is_empty());
    }

    #[test]
    fn test_collection_entry_fields_follow_filter() {
        let section = Section::new("c", SectionType::ProductCollection, 0)
            .with_settings(json!({ "filterBy": "category" }).as_object().unwrap());
        let panel = SettingsPanel::for_section(&section);
        let list = panel.field("collections").unwrap().list.as_ref().unwrap();
        assert_eq!(list.entry_fields, vec!["name", "categoryId", "imageUrl"]);
    }
}

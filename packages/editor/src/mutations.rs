//! # Section Mutations
//!
//! Operations on one page's section sequence and on the settings and
//! styles of individual sections.
//!
//! ## Mutation Semantics
//!
//! ### Field edits
//! - Shallow: only the named field changes, every other field is kept
//! - A value that does not fit the field is rejected and nothing changes
//! - Last write wins per field, never per section
//!
//! ### List entries
//! - Entries are addressed by position only
//! - Removal re-indexes the remainder
//! - Adjacent swap is a no-op at either boundary
//!
//! ### Sequence changes
//! - Add, remove, duplicate and reorder are each atomic on the page

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use storefront_schema::{
    schema, CoerceMode, Direction, Page, SchemaError, Section, SectionType, StyleField,
};
use thiserror::Error;

/// Semantic mutations on a page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Replace one settings field
    SetSetting {
        section_id: String,
        field: String,
        value: Value,
    },

    /// Replace one style field (one side for padding and margin)
    SetStyle {
        section_id: String,
        field: StyleField,
        value: Value,
    },

    /// Append a default entry to a sub-record list
    AppendListEntry { section_id: String, field: String },

    /// Replace one field of the entry at `index`
    UpdateListEntry {
        section_id: String,
        field: String,
        index: usize,
        entry_field: String,
        value: Value,
    },

    RemoveListEntry {
        section_id: String,
        field: String,
        index: usize,
    },

    /// Swap the entry at `index` with its neighbour
    MoveListEntry {
        section_id: String,
        field: String,
        index: usize,
        direction: Direction,
    },

    /// Keep only the first `len` entries
    TruncateList {
        section_id: String,
        field: String,
        len: usize,
    },

    SetVisibility { section_id: String, visible: bool },

    ToggleVisibility { section_id: String },

    /// Append a section with type defaults; the id is generated when absent
    AddSection {
        section_type: SectionType,
        section_id: Option<String>,
    },

    RemoveSection { section_id: String },

    /// Insert a copy directly after the source section
    DuplicateSection {
        section_id: String,
        new_id: Option<String>,
    },

    /// Put sections in the listed order; orders become 0..n
    ReorderSections { section_ids: Vec<String> },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Section id already in use: {0}")]
    DuplicateSectionId(String),

    #[error("Reorder must list every section exactly once")]
    InvalidReorder,

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Page id already in use: {0}")]
    DuplicatePageId(String),

    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),

    #[error("System page cannot be changed this way: {0}")]
    SystemPage(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl MutationError {
    /// Rejected user input rather than a structural failure
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, MutationError::Schema(SchemaError::InvalidFieldInput { .. }))
    }
}

/// Outcome of an applied mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Session version after the mutation
    pub version: u64,

    /// Section created or touched, if any
    pub section_id: Option<String>,

    /// False when the mutation left the document as it was
    pub changed: bool,
}

impl Mutation {
    /// Section the mutation targets, if it targets an existing one
    pub fn section_id(&self) -> Option<&str> {
        match self {
            Mutation::SetSetting { section_id, .. }
            | Mutation::SetStyle { section_id, .. }
            | Mutation::AppendListEntry { section_id, .. }
            | Mutation::UpdateListEntry { section_id, .. }
            | Mutation::RemoveListEntry { section_id, .. }
            | Mutation::MoveListEntry { section_id, .. }
            | Mutation::TruncateList { section_id, .. }
            | Mutation::SetVisibility { section_id, .. }
            | Mutation::ToggleVisibility { section_id }
            | Mutation::RemoveSection { section_id }
            | Mutation::DuplicateSection { section_id, .. } => Some(section_id.as_str()),
            Mutation::AddSection { .. } | Mutation::ReorderSections { .. } => None,
        }
    }

    /// Changes the page's section sequence rather than one section
    pub fn is_sequence_change(&self) -> bool {
        matches!(
            self,
            Mutation::AddSection { .. }
                | Mutation::RemoveSection { .. }
                | Mutation::DuplicateSection { .. }
                | Mutation::ReorderSections { .. }
        )
    }

    /// Apply mutation to a page with validation.
    ///
    /// Returns the id of the section created or touched. On error the page
    /// is left exactly as it was.
    pub fn apply(&self, page: &mut Page) -> Result<Option<String>, MutationError> {
        self.validate(page)?;

        match self {
            Mutation::SetSetting { section_id, field, value } => {
                Self::apply_set_setting(page, section_id, field, value)
            }

            Mutation::SetStyle { section_id, field, value } => {
                Self::apply_set_style(page, section_id, *field, value)
            }

            Mutation::AppendListEntry { section_id, field } => {
                Self::apply_append_entry(page, section_id, field)
            }

            Mutation::UpdateListEntry { section_id, field, index, entry_field, value } => {
                Self::apply_update_entry(page, section_id, field, *index, entry_field, value)
            }

            Mutation::RemoveListEntry { section_id, field, index } => {
                Self::apply_remove_entry(page, section_id, field, *index)
            }

            Mutation::MoveListEntry { section_id, field, index, direction } => {
                Self::apply_move_entry(page, section_id, field, *index, *direction)
            }

            Mutation::TruncateList { section_id, field, len } => {
                Self::apply_truncate(page, section_id, field, *len)
            }

            Mutation::SetVisibility { section_id, visible } => {
                let section = Self::section_mut(page, section_id)?;
                section.visible = *visible;
                Ok(Some(section_id.clone()))
            }

            Mutation::ToggleVisibility { section_id } => {
                let section = Self::section_mut(page, section_id)?;
                section.visible = !section.visible;
                Ok(Some(section_id.clone()))
            }

            Mutation::AddSection { section_type, section_id } => {
                Self::apply_add(page, section_type, section_id.as_deref())
            }

            Mutation::RemoveSection { section_id } => {
                page.sections.retain(|s| &s.id != section_id);
                Ok(Some(section_id.clone()))
            }

            Mutation::DuplicateSection { section_id, new_id } => {
                Self::apply_duplicate(page, section_id, new_id.as_deref())
            }

            Mutation::ReorderSections { section_ids } => {
                Self::apply_reorder(page, section_ids);
                Ok(None)
            }
        }
    }

    /// Check structural preconditions without touching the page
    pub fn validate(&self, page: &Page) -> Result<(), MutationError> {
        if let Some(section_id) = self.section_id() {
            if page.section(section_id).is_none() {
                return Err(MutationError::SectionNotFound(section_id.to_string()));
            }
        }

        match self {
            Mutation::AddSection { section_type, section_id } => {
                if !section_type.is_known() {
                    return Err(SchemaError::UnknownSectionType(section_type.to_string()).into());
                }
                Self::check_unused(page, section_id.as_deref())
            }

            Mutation::DuplicateSection { new_id, .. } => Self::check_unused(page, new_id.as_deref()),

            Mutation::ReorderSections { section_ids } => {
                let mut listed: Vec<&str> = section_ids.iter().map(String::as_str).collect();
                let mut current: Vec<&str> = page.sections.iter().map(|s| s.id.as_str()).collect();
                listed.sort_unstable();
                current.sort_unstable();
                if listed != current {
                    return Err(MutationError::InvalidReorder);
                }
                Ok(())
            }

            _ => Ok(()),
        }
    }

    fn check_unused(page: &Page, id: Option<&str>) -> Result<(), MutationError> {
        match id {
            Some(id) if page.section(id).is_some() => {
                Err(MutationError::DuplicateSectionId(id.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn section_mut<'a>(page: &'a mut Page, section_id: &str) -> Result<&'a mut Section, MutationError> {
        page.section_mut(section_id)
            .ok_or_else(|| MutationError::SectionNotFound(section_id.to_string()))
    }

    fn apply_set_setting(
        page: &mut Page,
        section_id: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<String>, MutationError> {
        let section = Self::section_mut(page, section_id)?;
        section.settings = section.settings.with_field(field, value)?;
        Ok(Some(section_id.to_string()))
    }

    fn apply_set_style(
        page: &mut Page,
        section_id: &str,
        field: StyleField,
        value: &Value,
    ) -> Result<Option<String>, MutationError> {
        let section = Self::section_mut(page, section_id)?;
        section.styles = section.styles.with_field(field, value)?;
        Ok(Some(section_id.to_string()))
    }

    fn apply_append_entry(
        page: &mut Page,
        section_id: &str,
        field: &str,
    ) -> Result<Option<String>, MutationError> {
        let section = Self::section_mut(page, section_id)?;
        let (spec, mut entries) = section.settings.list_entries(field)?;
        if !spec.appendable {
            return Err(unsupported(field, "append"));
        }
        entries.push(Value::Object((spec.entry_default)()));
        section.settings = section.settings.with_list(field, entries)?;
        Ok(Some(section_id.to_string()))
    }

    fn apply_update_entry(
        page: &mut Page,
        section_id: &str,
        field: &str,
        index: usize,
        entry_field: &str,
        value: &Value,
    ) -> Result<Option<String>, MutationError> {
        let section = Self::section_mut(page, section_id)?;
        let (spec, mut entries) = section.settings.list_entries(field)?;

        let editable = spec.max_editable.map_or(entries.len(), |max| max.min(entries.len()));
        if index >= editable {
            return Err(out_of_bounds(field, index, editable));
        }

        let entry_spec = spec
            .entry
            .iter()
            .find(|f| f.name == entry_field)
            .ok_or_else(|| SchemaError::UnknownField {
                section_type: format!("{}.{}", section.section_type(), field),
                field: entry_field.to_string(),
            })?;
        let coerced = schema::coerce(field, entry_spec, value, CoerceMode::Edit)?;

        if let Some(slot) = entries.get_mut(index) {
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(entry) = slot {
                entry.insert(entry_field.to_string(), coerced);
            }
        }

        section.settings = section.settings.with_list(field, entries)?;
        Ok(Some(section_id.to_string()))
    }

    fn apply_remove_entry(
        page: &mut Page,
        section_id: &str,
        field: &str,
        index: usize,
    ) -> Result<Option<String>, MutationError> {
        let section = Self::section_mut(page, section_id)?;
        let (spec, mut entries) = section.settings.list_entries(field)?;
        if !spec.appendable {
            return Err(unsupported(field, "remove"));
        }
        let len = entries.len();
        entries
            .remove(index)
            .ok_or_else(|| out_of_bounds(field, index, len))?;
        section.settings = section.settings.with_list(field, entries)?;
        Ok(Some(section_id.to_string()))
    }

    fn apply_move_entry(
        page: &mut Page,
        section_id: &str,
        field: &str,
        index: usize,
        direction: Direction,
    ) -> Result<Option<String>, MutationError> {
        let section = Self::section_mut(page, section_id)?;
        let (spec, mut entries) = section.settings.list_entries(field)?;
        if !spec.swappable {
            return Err(unsupported(field, "reordering"));
        }
        if index >= entries.len() {
            return Err(out_of_bounds(field, index, entries.len()));
        }
        if entries.swap_adjacent(index, direction) {
            section.settings = section.settings.with_list(field, entries)?;
        }
        Ok(Some(section_id.to_string()))
    }

    fn apply_truncate(
        page: &mut Page,
        section_id: &str,
        field: &str,
        len: usize,
    ) -> Result<Option<String>, MutationError> {
        let section = Self::section_mut(page, section_id)?;
        let (_, mut entries) = section.settings.list_entries(field)?;
        if entries.len() > len {
            entries.truncate(len);
            section.settings = section.settings.with_list(field, entries)?;
        }
        Ok(Some(section_id.to_string()))
    }

    fn apply_add(
        page: &mut Page,
        section_type: &SectionType,
        section_id: Option<&str>,
    ) -> Result<Option<String>, MutationError> {
        let id = section_id
            .map(str::to_string)
            .unwrap_or_else(|| page.generate_section_id(section_type));
        let section = Section::new(id.clone(), section_type.clone(), page.next_order());
        page.sections.push(section);
        Ok(Some(id))
    }

    fn apply_duplicate(
        page: &mut Page,
        section_id: &str,
        new_id: Option<&str>,
    ) -> Result<Option<String>, MutationError> {
        let position = page
            .position(section_id)
            .ok_or_else(|| MutationError::SectionNotFound(section_id.to_string()))?;

        let mut copy = page.sections[position].clone();
        copy.id = new_id
            .map(str::to_string)
            .unwrap_or_else(|| page.generate_section_id(&copy.section_type()));

        // Same order value right after the source: the stable sort keeps the pair adjacent.
        let id = copy.id.clone();
        page.sections.insert(position + 1, copy);
        Ok(Some(id))
    }

    fn apply_reorder(page: &mut Page, section_ids: &[String]) {
        let mut remaining = std::mem::take(&mut page.sections);
        for (order, id) in section_ids.iter().enumerate() {
            if let Some(position) = remaining.iter().position(|s| &s.id == id) {
                let mut section = remaining.remove(position);
                section.order = order as f64;
                page.sections.push(section);
            }
        }
    }
}

fn unsupported(field: &str, operation: &'static str) -> MutationError {
    SchemaError::UnsupportedListOperation {
        field: field.to_string(),
        operation,
    }
    .into()
}

fn out_of_bounds(field: &str, index: usize, len: usize) -> MutationError {
    SchemaError::IndexOutOfBounds {
        field: field.to_string(),
        index,
        len,
    }
    .into()
}

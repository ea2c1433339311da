//! # Edit Session Management
//!
//! An EditSession is one editing host's view of a store: the builder
//! document, the page being edited, the selected section and the saves
//! that have not reached the persistence collaborator yet.
//!
//! Edits apply to the local document immediately. Each discrete edit
//! queues one save; [`EditSession::flush`] sends them in order. A failed
//! save becomes a retryable notification and the local document is kept
//! as it is.

use crate::builder_mutations::BuilderMutation;
use crate::edit::{edit_section, SectionPatch};
use crate::errors::{EditorError, PersistenceError};
use crate::mutations::{Mutation, MutationError, MutationResult};
use crate::post_effects::PostEffectEngine;
use crate::repository::{SavePayload, StoreRepository};
use crate::settings_editor::SettingsEditor;
use chrono::{DateTime, Utc};
use storefront_schema::{Builder, Page, Section};
use tracing::{debug, info, instrument, warn};

/// Single edit session
#[derive(Debug)]
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    pub store_id: String,

    /// Builder document being edited
    pub builder: Builder,

    /// Current version number (increments on each applied change)
    pub version: u64,

    page_id: String,
    selected_section: Option<String>,
    pending_saves: Vec<PendingSave>,
    failed_saves: Vec<PendingSave>,
    notifications: Vec<SaveNotification>,
    effects: PostEffectEngine,
    next_save: u64,
}

/// Save waiting to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub id: String,
    pub payload: SavePayload,
    pub created_at: DateTime<Utc>,
}

/// Surfaced to the editing host when a save fails
#[derive(Debug, Clone, PartialEq)]
pub struct SaveNotification {
    pub save_id: String,
    pub message: String,
    pub retryable: bool,
    pub error: PersistenceError,
}

/// Outcome of one [`EditSession::flush`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlushReport {
    pub saved: Vec<String>,
    pub failed: Vec<String>,
}

impl EditSession {
    /// Create new edit session on the builder's active page
    pub fn new(id: impl Into<String>, store_id: impl Into<String>, mut builder: Builder) -> Self {
        if builder.pages.is_empty() {
            builder.pages.push(Page::home());
        }
        let page_id = builder
            .active_page()
            .map(|p| p.id.clone())
            .unwrap_or_default();

        Self {
            id: id.into(),
            store_id: store_id.into(),
            builder,
            version: 0,
            page_id,
            selected_section: None,
            pending_saves: Vec::new(),
            failed_saves: Vec::new(),
            notifications: Vec::new(),
            effects: PostEffectEngine::new(),
            next_save: 0,
        }
    }

    /// Load a store and open a session on it
    #[instrument(skip(repository))]
    pub async fn open(
        id: &str,
        store_id: &str,
        repository: &dyn StoreRepository,
    ) -> Result<Self, EditorError> {
        let store = repository.load(store_id).await?;
        info!(pages = store.builder.pages.len(), "Opened edit session");
        Ok(Self::new(id, store_id, store.builder))
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    /// The page being edited
    pub fn page(&self) -> Result<&Page, EditorError> {
        self.builder
            .page(&self.page_id)
            .ok_or_else(|| EditorError::PageNotFound(self.page_id.clone()))
    }

    /// Edit another page; the selection is cleared
    pub fn switch_page(&mut self, page_id: &str) -> Result<(), EditorError> {
        if self.builder.page(page_id).is_none() {
            return Err(EditorError::PageNotFound(page_id.to_string()));
        }
        self.page_id = page_id.to_string();
        self.builder.active_page_id = Some(page_id.to_string());
        self.selected_section = None;
        Ok(())
    }

    pub fn select(&mut self, section_id: &str) -> Result<(), EditorError> {
        if self.page()?.section(section_id).is_none() {
            return Err(MutationError::SectionNotFound(section_id.to_string()).into());
        }
        self.selected_section = Some(section_id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_section = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_section.as_deref()
    }

    pub fn selected(&self) -> Option<&Section> {
        let id = self.selected_section.as_deref()?;
        self.page().ok()?.section(id)
    }

    /// Settings editor bound to the current selection
    pub fn editor(&mut self) -> SettingsEditor<'_> {
        SettingsEditor::new(self)
    }

    /// Apply mutation optimistically and queue its save.
    ///
    /// Input that does not fit its field is a no-op: the result reports no
    /// change and nothing is queued.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let page = self
            .builder
            .page_mut(&self.page_id)
            .ok_or_else(|| EditorError::PageNotFound(self.page_id.clone()))?;
        let before = page.clone();

        let section_id = match self.effects.apply_with_effects(mutation.clone(), page) {
            Ok((_, section_id)) => section_id,
            Err(e) if e.is_invalid_input() => {
                debug!(error = %e, "Rejected field input - keeping prior value");
                return Ok(self.unchanged(mutation.section_id().map(str::to_string)));
            }
            Err(e) => return Err(e.into()),
        };

        if *page == before {
            return Ok(self.unchanged(section_id));
        }

        let payload = if mutation.is_sequence_change() {
            SavePayload::Page { page: page.clone() }
        } else {
            let id = section_id.clone().unwrap_or_default();
            let (Some(old), Some(new)) = (before.section(&id), page.section(&id)) else {
                return Err(MutationError::SectionNotFound(id).into());
            };
            SavePayload::Section {
                page_id: self.page_id.clone(),
                patch: SectionPatch::between(old, new),
                section_id: id,
            }
        };

        if let Mutation::RemoveSection { section_id } = &mutation {
            if self.selected_section.as_ref() == Some(section_id) {
                self.selected_section = None;
            }
        }

        Ok(self.changed(payload, section_id))
    }

    /// Apply a page-level or store-wide mutation and queue a builder save
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn apply_builder(&mut self, mutation: BuilderMutation) -> Result<MutationResult, EditorError> {
        let before = self.builder.clone();
        let page_id = mutation.apply(&mut self.builder)?;

        if self.builder == before {
            return Ok(self.unchanged(None));
        }

        match &mutation {
            BuilderMutation::AddPage { .. } | BuilderMutation::SetActivePage { .. } => {
                if let Some(id) = &page_id {
                    self.page_id = id.clone();
                    self.selected_section = None;
                }
            }
            BuilderMutation::RemovePage { page_id: removed } if removed == &self.page_id => {
                self.page_id = self
                    .builder
                    .active_page()
                    .map(|p| p.id.clone())
                    .unwrap_or_default();
                self.selected_section = None;
            }
            _ => {}
        }

        let payload = SavePayload::Builder {
            builder: self.builder.clone(),
        };
        Ok(self.changed(payload, None))
    }

    /// Apply a document-shaped patch to one section of the current page
    pub fn patch_section(
        &mut self,
        section_id: &str,
        patch: &SectionPatch,
    ) -> Result<MutationResult, EditorError> {
        let page = self
            .builder
            .page_mut(&self.page_id)
            .ok_or_else(|| EditorError::PageNotFound(self.page_id.clone()))?;
        let section = page
            .section_mut(section_id)
            .ok_or_else(|| MutationError::SectionNotFound(section_id.to_string()))?;

        let edited = edit_section(section, patch);
        if edited == *section {
            return Ok(self.unchanged(Some(section_id.to_string())));
        }
        let applied = SectionPatch::between(section, &edited);
        *section = edited;

        let payload = SavePayload::Section {
            page_id: self.page_id.clone(),
            section_id: section_id.to_string(),
            patch: applied,
        };
        Ok(self.changed(payload, Some(section_id.to_string())))
    }

    fn unchanged(&self, section_id: Option<String>) -> MutationResult {
        MutationResult {
            version: self.version,
            section_id,
            changed: false,
        }
    }

    fn changed(&mut self, payload: SavePayload, section_id: Option<String>) -> MutationResult {
        self.version += 1;
        self.builder.draft = true;
        self.enqueue(payload);
        MutationResult {
            version: self.version,
            section_id,
            changed: true,
        }
    }

    fn enqueue(&mut self, payload: SavePayload) -> String {
        let save_id = format!("{}-{}", self.id, self.next_save);
        self.next_save += 1;
        self.pending_saves.push(PendingSave {
            id: save_id.clone(),
            payload,
            created_at: Utc::now(),
        });
        save_id
    }

    /// Send every queued save, in order
    #[instrument(skip(self, repository), fields(session = %self.id, pending = self.pending_saves.len()))]
    pub async fn flush(&mut self, repository: &dyn StoreRepository) -> FlushReport {
        let mut report = FlushReport::default();

        for save in std::mem::take(&mut self.pending_saves) {
            match repository.save(&self.store_id, &save.payload).await {
                Ok(ack) => {
                    self.builder.last_saved = Some(ack.saved_at);
                    report.saved.push(save.id);
                }
                Err(error) => {
                    warn!(save_id = %save.id, error = %error, "Save failed - keeping local document");
                    self.notifications.push(SaveNotification {
                        save_id: save.id.clone(),
                        message: format!("Could not save {}: {}", save.payload.describe(), error),
                        retryable: true,
                        error,
                    });
                    report.failed.push(save.id.clone());
                    self.failed_saves.push(save);
                }
            }
        }

        report
    }

    /// Queue a failed save again; its notification is cleared
    pub fn retry(&mut self, save_id: &str) -> Result<(), EditorError> {
        let position = self
            .failed_saves
            .iter()
            .position(|s| s.id == save_id)
            .ok_or_else(|| EditorError::SaveNotFound(save_id.to_string()))?;
        let save = self.failed_saves.remove(position);
        self.notifications.retain(|n| n.save_id != save_id);
        self.pending_saves.push(save);
        Ok(())
    }

    /// Queue every failed save again
    pub fn retry_all(&mut self) {
        self.notifications.clear();
        let failed = std::mem::take(&mut self.failed_saves);
        self.pending_saves.extend(failed);
    }

    pub fn dismiss(&mut self, save_id: &str) {
        self.notifications.retain(|n| n.save_id != save_id);
    }

    pub fn notifications(&self) -> &[SaveNotification] {
        &self.notifications
    }

    pub fn pending_saves(&self) -> &[PendingSave] {
        &self.pending_saves
    }

    pub fn pending_count(&self) -> usize {
        self.pending_saves.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed_saves.len()
    }
}

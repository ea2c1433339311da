//! # Storefront Editor
//!
//! Settings editing and section lifecycle for storefront pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ schema: Store → Page → Section documents    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: selection + field-scoped mutations  │
//! │  - Settings and style field edits           │
//! │  - List entry append/update/remove/swap     │
//! │  - Add, remove, duplicate, reorder sections │
//! │  - Optimistic apply, queued saves           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ persistence collaborator: load / save       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Shallow edits**: a mutation names one field and never replaces the
//!    rest of the record
//! 2. **Rejected input is a no-op**: the prior value stays
//! 3. **Optimistic**: the local document never rolls back on a failed save
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_editor::{EditSession, MemoryRepository};
//!
//! let repository = MemoryRepository::new();
//! let mut session = EditSession::open("client-1", "store-1", &repository).await?;
//!
//! session.select("hero-1")?;
//! session.editor().update_setting("heading", json!("Spring sale"))?;
//!
//! let report = session.flush(&repository).await;
//! for notification in session.notifications() {
//!     // offer a retry
//! }
//! ```

mod builder_mutations;
mod edit;
mod errors;
mod mutations;
mod post_effects;
mod repository;
mod session;
mod settings_editor;

pub use builder_mutations::BuilderMutation;
pub use edit::{edit_section, SectionPatch};
pub use errors::{EditorError, PersistenceError};
pub use mutations::{Mutation, MutationError, MutationResult};
pub use post_effects::{CollapseSingleImageLayout, PostEffect, PostEffectEngine};
pub use repository::{FileRepository, MemoryRepository, SaveAck, SavePayload, StoreRepository};
pub use session::{EditSession, FlushReport, PendingSave, SaveNotification};
pub use settings_editor::{PanelField, PanelList, SettingsEditor, SettingsPanel};

// Re-export document types for convenience
pub use storefront_schema::{Builder, Direction, Page, Section, SectionType, Store, StyleField};

//! # Persistence collaborator
//!
//! Stores are loaded whole and saved piecewise: the changed fields of one
//! section, one page, or the builder document. Section saves merge field by
//! field, so edits to different fields of a section never overwrite each
//! other, whatever order they arrive in. Backends:
//! - **Memory**: in-process, with optional injected save failures
//! - **File**: one JSON document per store under a root directory

use crate::edit::{edit_section, SectionPatch};
use crate::errors::PersistenceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use storefront_schema::{Builder, Page, Store};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// What one save carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SavePayload {
    /// The changed fields of one section
    Section {
        page_id: String,
        section_id: String,
        patch: SectionPatch,
    },

    /// A whole page, after a change to its section sequence
    Page { page: Page },

    /// The whole builder, after a page-level or store-wide change
    Builder { builder: Builder },
}

impl SavePayload {
    pub fn describe(&self) -> String {
        match self {
            SavePayload::Section {
                page_id,
                section_id,
                patch,
            } => format!(
                "section {} on page {} ({})",
                section_id,
                page_id,
                patch.field_names().join(", ")
            ),
            SavePayload::Page { page } => format!("page {}", page.id),
            SavePayload::Builder { .. } => "builder".to_string(),
        }
    }

    /// Write the payload into a loaded store
    pub fn apply_to(&self, store: &mut Store) -> Result<(), PersistenceError> {
        let builder = &mut store.builder;
        match self {
            SavePayload::Section {
                page_id,
                section_id,
                patch,
            } => {
                let rejected = |reason: String| PersistenceError::Rejected {
                    store_id: store.id.clone(),
                    reason,
                };
                let page = builder
                    .page_mut(page_id)
                    .ok_or_else(|| rejected(format!("page {} does not exist", page_id)))?;
                let section = page
                    .section_mut(section_id)
                    .ok_or_else(|| rejected(format!("section {} does not exist", section_id)))?;
                *section = edit_section(section, patch);
            }
            SavePayload::Page { page } => match builder.page_mut(&page.id) {
                Some(existing) => *existing = page.clone(),
                None => builder.pages.push(page.clone()),
            },
            SavePayload::Builder { builder: next } => *builder = next.clone(),
        }
        Ok(())
    }
}

/// Acknowledgement of a completed save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAck {
    pub store_id: String,
    pub saved_at: DateTime<Utc>,
}

#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn load(&self, store_id: &str) -> Result<Store, PersistenceError>;

    async fn save(&self, store_id: &str, payload: &SavePayload) -> Result<SaveAck, PersistenceError>;
}

fn stamp(store: &mut Store) -> SaveAck {
    let saved_at = Utc::now();
    store.builder.last_saved = Some(saved_at);
    SaveAck {
        store_id: store.id.clone(),
        saved_at,
    }
}

/// In-process repository. Clones share the same stores.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    stores: Arc<RwLock<HashMap<String, Store>>>,
    failures: Arc<AtomicUsize>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, store: Store) {
        self.stores.write().await.insert(store.id.clone(), store);
    }

    /// Reject the next `count` saves
    pub fn fail_next_saves(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    pub async fn snapshot(&self, store_id: &str) -> Option<Store> {
        self.stores.read().await.get(store_id).cloned()
    }

    fn take_failure(&self) -> bool {
        self.failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl StoreRepository for MemoryRepository {
    async fn load(&self, store_id: &str) -> Result<Store, PersistenceError> {
        self.snapshot(store_id)
            .await
            .ok_or_else(|| PersistenceError::StoreNotFound(store_id.to_string()))
    }

    async fn save(&self, store_id: &str, payload: &SavePayload) -> Result<SaveAck, PersistenceError> {
        if self.take_failure() {
            warn!(store_id, payload = %payload.describe(), "Injected save failure");
            return Err(PersistenceError::Rejected {
                store_id: store_id.to_string(),
                reason: "storage temporarily unavailable".to_string(),
            });
        }

        let mut stores = self.stores.write().await;
        let store = stores
            .get_mut(store_id)
            .ok_or_else(|| PersistenceError::StoreNotFound(store_id.to_string()))?;
        payload.apply_to(store)?;
        debug!(store_id, payload = %payload.describe(), "Saved");
        Ok(stamp(store))
    }
}

/// One `<store id>.json` file per store under `root`.
///
/// Clones share one lock per store, held across each read-apply-write
/// cycle, so concurrent saves through any clone apply one after another.
#[derive(Debug, Clone)]
pub struct FileRepository {
    root: PathBuf,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
    next_tmp: Arc<AtomicU64>,
}

impl FileRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Arc::default(),
            next_tmp: Arc::default(),
        }
    }

    async fn store_lock(&self, store_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .await
            .entry(store_id.to_string())
            .or_default()
            .clone()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, store_id: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !store_id.is_empty()
            && store_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistenceError::InvalidStoreId(store_id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", store_id)))
    }

    /// Write a whole store document, creating the root if needed
    pub async fn create(&self, store: &Store) -> Result<(), PersistenceError> {
        let path = self.path_for(&store.id)?;
        let lock = self.store_lock(&store.id).await;
        let _guard = lock.lock().await;
        tokio::fs::create_dir_all(&self.root).await?;
        self.write(&path, store).await?;
        info!(store_id = %store.id, path = %path.display(), "Created store document");
        Ok(())
    }

    async fn read(&self, store_id: &str, path: &Path) -> Result<Store, PersistenceError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersistenceError::StoreNotFound(store_id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    async fn write(&self, path: &Path, store: &Store) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(store)?;
        let n = self.next_tmp.fetch_add(1, Ordering::SeqCst);
        let tmp = path.with_extension(format!("json.{}.{}.tmp", std::process::id(), n));
        tokio::fs::write(&tmp, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl StoreRepository for FileRepository {
    async fn load(&self, store_id: &str) -> Result<Store, PersistenceError> {
        let path = self.path_for(store_id)?;
        self.read(store_id, &path).await
    }

    async fn save(&self, store_id: &str, payload: &SavePayload) -> Result<SaveAck, PersistenceError> {
        let path = self.path_for(store_id)?;
        let lock = self.store_lock(store_id).await;
        let _guard = lock.lock().await;

        let mut store = self.read(store_id, &path).await?;
        payload.apply_to(&mut store)?;
        let ack = stamp(&mut store);
        self.write(&path, &store).await?;
        debug!(store_id, payload = %payload.describe(), "Saved to disk");
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use storefront_schema::{Section, SectionType};

    fn store_with_text() -> Store {
        let mut store = Store::new("s1", "Shop");
        store.builder.pages[0]
            .sections
            .push(Section::new("t", SectionType::Text, 0));
        store
    }

    fn field_save(field: &str, value: Value) -> SavePayload {
        let mut patch = Map::new();
        patch.insert(field.to_string(), value);
        SavePayload::Section {
            page_id: "home".to_string(),
            section_id: "t".to_string(),
            patch: SectionPatch::settings(patch),
        }
    }

    #[tokio::test]
    async fn test_memory_section_save_merges_fields() {
        let repo = MemoryRepository::new();
        repo.insert(store_with_text()).await;

        repo.save("s1", &field_save("heading", json!("Story"))).await.unwrap();
        repo.save("s1", &field_save("content", json!("<p>Hi</p>"))).await.unwrap();

        let saved = repo.load("s1").await.unwrap();
        let settings = saved.builder.pages[0].sections[0].settings.to_map();
        assert_eq!(settings["heading"], json!("Story"));
        assert_eq!(settings["content"], json!("<p>Hi</p>"));
        assert!(saved.builder.last_saved.is_some());
    }

    #[tokio::test]
    async fn test_section_save_for_missing_section_is_rejected() {
        let repo = MemoryRepository::new();
        repo.insert(Store::new("s1", "Shop")).await;
        assert!(matches!(
            repo.save("s1", &field_save("heading", json!("x"))).await,
            Err(PersistenceError::Rejected { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_repository_concurrent_saves_keep_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(dir.path());
        repo.create(&store_with_text()).await.unwrap();

        let fields = [
            ("heading", json!("Story")),
            ("content", json!("<p>Since 2020</p>")),
            ("alignment", json!("center")),
        ];
        let tasks: Vec<_> = fields
            .iter()
            .cloned()
            .map(|(field, value)| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.save("s1", &field_save(field, value)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let saved = repo.load("s1").await.unwrap();
        let settings = saved.builder.pages[0].sections[0].settings.to_map();
        for (field, value) in &fields {
            assert_eq!(&settings[*field], value, "{} was lost", field);
        }

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_injected_failures_are_consumed() {
        let repo = MemoryRepository::new();
        repo.insert(Store::new("s1", "Shop")).await;
        repo.fail_next_saves(1);

        let payload = SavePayload::Builder {
            builder: Builder::default(),
        };
        assert!(matches!(
            repo.save("s1", &payload).await,
            Err(PersistenceError::Rejected { .. })
        ));
        assert!(repo.save("s1", &payload).await.is_ok());
    }

    #[tokio::test]
    async fn test_file_repository_rejects_path_like_ids() {
        let repo = FileRepository::new("/tmp/unused");
        assert!(matches!(
            repo.load("../etc/passwd").await,
            Err(PersistenceError::InvalidStoreId(_))
        ));
    }
}

//! Error types for the editor

use crate::mutations::MutationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("No section selected")]
    NoSelection,

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Save not found: {0}")]
    SaveNotFound(String),
}

/// A save or load the persistence collaborator could not complete
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("Invalid store id: {0}")]
    InvalidStoreId(String),

    #[error("Save rejected for store {store_id}: {reason}")]
    Rejected { store_id: String, reason: String },

    #[error("IO error: {0}")]
    Io(String),

    #[error("Malformed store document: {0}")]
    Malformed(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Malformed(e.to_string())
    }
}

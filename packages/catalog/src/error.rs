use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures reported by a catalog collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Catalog unavailable while loading {what}: {reason}")]
    Unavailable { what: String, reason: String },

    #[error("Malformed catalog record: {0}")]
    Malformed(String),
}

impl CatalogError {
    pub fn unavailable(what: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::Unavailable {
            what: what.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Malformed(e.to_string())
    }
}

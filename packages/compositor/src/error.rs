use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("No view registered for section type '{0}'")]
    UnknownSectionType(String),

    #[error("Catalog data unavailable for {what}: {reason}")]
    MissingCatalogData { what: String, reason: String },

    #[error("Cannot embed media from '{url}'")]
    InvalidMedia { url: String },
}

pub type RenderResult<T> = Result<T, RenderError>;

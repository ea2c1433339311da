//! Error types for the section schema

use thiserror::Error;

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Field '{field}' of '{section_type}' has an unexpected shape (expected {expected})")]
    SchemaMismatch {
        section_type: String,
        field: String,
        expected: String,
    },

    #[error("Unknown section type: {0}")]
    UnknownSectionType(String),

    #[error("Unknown field '{field}' for section type '{section_type}'")]
    UnknownField { section_type: String, field: String },

    #[error("Invalid input for field '{field}': {reason}")]
    InvalidFieldInput { field: String, reason: String },

    #[error("Field '{0}' is not a list")]
    NotAList(String),

    #[error("Index {index} out of bounds for list '{field}' (len {len})")]
    IndexOutOfBounds {
        field: String,
        index: usize,
        len: usize,
    },

    #[error("List '{field}' does not support {operation}")]
    UnsupportedListOperation {
        field: String,
        operation: &'static str,
    },
}

impl SchemaError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::InvalidFieldInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};

/// State of one asynchronous catalog dependency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum Fetch<T> {
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> Default for Fetch<T> {
    fn default() -> Self {
        Fetch::Pending
    }
}

impl<T> Fetch<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Fetch::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Fetch::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Fetch<&T> {
        match self {
            Fetch::Pending => Fetch::Pending,
            Fetch::Ready(value) => Fetch::Ready(value),
            Fetch::Failed(reason) => Fetch::Failed(reason.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetch<U> {
        match self {
            Fetch::Pending => Fetch::Pending,
            Fetch::Ready(value) => Fetch::Ready(f(value)),
            Fetch::Failed(reason) => Fetch::Failed(reason),
        }
    }
}

impl<T> From<Result<T, CatalogError>> for Fetch<T> {
    fn from(result: Result<T, CatalogError>) -> Self {
        match result {
            Ok(value) => Fetch::Ready(value),
            Err(e) => Fetch::Failed(e.to_string()),
        }
    }
}

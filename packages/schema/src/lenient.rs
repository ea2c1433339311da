//! Field-level recovery for persisted documents.
//!
//! A field whose stored shape does not match its declared type falls back to
//! its default instead of failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    match serde_json::from_value::<T>(value) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warn!(error = %e, "Schema mismatch - substituting default");
            Ok(T::default())
        }
    }
}

/// Reads a number from a JSON value, accepting numeric strings.
pub fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

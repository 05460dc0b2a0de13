//! Field decoders that log and drop a malformed value instead of failing
//! the whole record.
//!
//! Documents from older or foreign editors carry enum strings this crate
//! does not know. One such field must not cost the node its other styles.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Decode an optional field; a value of the wrong shape becomes `None`.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(decode(value))
}

/// Decode a required field; a value of the wrong shape becomes the default.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode(value).unwrap_or_default())
}

fn decode<T: DeserializeOwned>(value: Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!(%value, error = %err, "ignoring malformed style field");
            None
        }
    }
}

//! Deserialization helpers for indexer payloads.
//!
//! The indexer emits `null` for numeric columns that were never written (for
//! example `beastHealth` before the first discovery). Those map to the zero
//! value so records always carry defined fields.
use serde::{Deserialize, Deserializer};

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Maps `null`, `""` and `"0"`-style empty references to `None`.
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(0)) => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let id = trimmed.parse::<u64>().map_err(serde::de::Error::custom)?;
            Ok((id != 0).then_some(id))
        }
    }
}

pub mod chat;
pub mod summary;

use serde::{Deserialize, Deserializer};

// Clients send `null` for empty lists; treat it like an omitted field.
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

//! Serde helpers shared by the DTOs.

use serde::{Deserialize, Deserializer};

/// Read an explicit `null` as the type's default.
///
/// Pair with `#[serde(default)]`, which only covers a missing field.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

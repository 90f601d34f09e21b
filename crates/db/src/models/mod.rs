//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod accommodation;
pub mod accommodation_image;
pub mod localized_accommodation;
pub mod location;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Deserialize a clearable patch field: absent stays `None` (via
/// `#[serde(default)]`), explicit `null` becomes `Some(None)`.
pub(crate) fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

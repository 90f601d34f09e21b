//! Localized accommodation description model and DTOs.

use lodging_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A row from the `localized_accommodations` table.
///
/// Unique per `(accommodation_id, language)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LocalizedAccommodation {
    pub id: DbId,
    pub accommodation_id: String,
    /// ISO 639-1 code, e.g. `en`, `ar`.
    pub language: String,
    pub description: String,
    pub policy: Option<Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a localized description. The accommodation comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLocalizedAccommodation {
    pub language: String,
    pub description: String,
    pub policy: Option<Value>,
}

/// DTO for updating a localized description. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLocalizedAccommodation {
    pub language: Option<String>,
    pub description: Option<String>,
    pub policy: Option<Value>,
}

//! Accommodation image model and DTOs.

use lodging_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An image row from the `accommodation_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccommodationImage {
    pub id: DbId,
    pub accommodation_id: String,
    /// Path relative to the media root.
    pub image_path: String,
    pub uploaded_at: Timestamp,
}

/// DTO for recording a stored upload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccommodationImage {
    pub accommodation_id: String,
    pub image_path: String,
}

//! Accommodation entity model and DTOs.

use lodging_core::accommodation::AccommodationFields;
use lodging_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// An accommodation row from the `accommodations` table.
///
/// Decimal columns serialize as strings (`"4.5"`, `"100.00"`) to keep
/// their exact precision on the wire.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Accommodation {
    pub id: String,
    pub feed: i16,
    pub title: String,
    pub country_code: String,
    pub bedroom_count: i32,
    pub review_score: Decimal,
    pub usd_rate: Decimal,
    pub latitude: f64,
    pub longitude: f64,
    pub location_id: String,
    pub amenities: Option<Value>,
    /// `None` once the owning user has been deleted.
    pub user_id: Option<DbId>,
    pub published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Accommodation {
    pub fn fields(&self) -> AccommodationFields<'_> {
        AccommodationFields {
            id: &self.id,
            title: &self.title,
            country_code: &self.country_code,
            feed: self.feed,
            bedroom_count: self.bedroom_count,
            review_score: self.review_score,
            usd_rate: self.usd_rate,
            latitude: self.latitude,
            longitude: self.longitude,
            amenities: self.amenities.as_ref(),
        }
    }
}

/// DTO for creating an accommodation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccommodation {
    pub id: String,
    /// Defaults to 0 if omitted.
    pub feed: Option<i16>,
    pub title: String,
    pub country_code: String,
    pub bedroom_count: i32,
    /// Defaults to 0 if omitted.
    pub review_score: Option<Decimal>,
    pub usd_rate: Decimal,
    pub latitude: f64,
    pub longitude: f64,
    pub location_id: String,
    /// JSON array of strings, or JSON text encoding one.
    pub amenities: Option<Value>,
    /// Defaults to the authenticated user.
    pub user_id: Option<DbId>,
    /// Defaults to `false` (draft).
    pub published: Option<bool>,
}

impl CreateAccommodation {
    pub fn fields(&self) -> AccommodationFields<'_> {
        AccommodationFields {
            id: &self.id,
            title: &self.title,
            country_code: &self.country_code,
            feed: self.feed.unwrap_or(0),
            bedroom_count: self.bedroom_count,
            review_score: self.review_score.unwrap_or(Decimal::ZERO),
            usd_rate: self.usd_rate,
            latitude: self.latitude,
            longitude: self.longitude,
            amenities: self.amenities.as_ref(),
        }
    }
}

/// DTO for updating an existing accommodation. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccommodation {
    pub feed: Option<i16>,
    pub title: Option<String>,
    pub country_code: Option<String>,
    pub bedroom_count: Option<i32>,
    pub review_score: Option<Decimal>,
    pub usd_rate: Option<Decimal>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_id: Option<String>,
    /// `null` clears the column; an absent field keeps it.
    #[serde(default, deserialize_with = "super::clearable")]
    pub amenities: Option<Option<Value>>,
    pub published: Option<bool>,
}

/// Query filters for listing accommodations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccommodationFilter {
    pub published: Option<bool>,
    pub location_id: Option<String>,
    /// Case-insensitive match on title, country code or location title.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn amenities_patch_distinguishes_null_from_absent() {
        let absent: UpdateAccommodation = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.amenities, None);

        let cleared: UpdateAccommodation =
            serde_json::from_value(json!({ "amenities": null })).unwrap();
        assert_eq!(cleared.amenities, Some(None));

        let replaced: UpdateAccommodation =
            serde_json::from_value(json!({ "amenities": ["Pool"] })).unwrap();
        assert_eq!(replaced.amenities, Some(Some(json!(["Pool"]))));
    }
}

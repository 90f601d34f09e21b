//! Accommodation field rules, owner scoping, and localized description rules.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::amenities::validate_optional_amenities;
use crate::error::CoreError;
use crate::location::{validate_coordinates, validate_country_code, validate_external_id, validate_title};
use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MAX_ACCOMMODATION_TITLE_LEN: usize = 100;

/// `review_score` is `NUMERIC(3, 1)` on a ten-point scale.
pub const REVIEW_SCORE_SCALE: u32 = 1;

/// `usd_rate` is `NUMERIC(10, 2)`.
pub const USD_RATE_SCALE: u32 = 2;

/// Exclusive upper bound of `usd_rate` (eight integer digits).
const USD_RATE_LIMIT: i64 = 100_000_000;

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Borrowed view of the writable accommodation columns.
#[derive(Debug, Clone, Copy)]
pub struct AccommodationFields<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub country_code: &'a str,
    pub feed: i16,
    pub bedroom_count: i32,
    pub review_score: Decimal,
    pub usd_rate: Decimal,
    pub latitude: f64,
    pub longitude: f64,
    pub amenities: Option<&'a Value>,
}

/// Validate every column of a new accommodation.
pub fn validate_accommodation(fields: &AccommodationFields<'_>) -> Result<(), CoreError> {
    validate_external_id(fields.id, "Accommodation")?;
    validate_title(fields.title, MAX_ACCOMMODATION_TITLE_LEN)?;
    validate_country_code(fields.country_code)?;
    validate_feed(fields.feed)?;
    validate_bedroom_count(fields.bedroom_count)?;
    validate_review_score(fields.review_score)?;
    validate_usd_rate(fields.usd_rate)?;
    validate_coordinates(fields.latitude, fields.longitude)?;
    validate_optional_amenities(fields.amenities)?;
    Ok(())
}

pub fn validate_feed(feed: i16) -> Result<(), CoreError> {
    if feed < 0 {
        return Err(CoreError::Validation("feed must not be negative".into()));
    }
    Ok(())
}

pub fn validate_bedroom_count(count: i32) -> Result<(), CoreError> {
    if count < 0 {
        return Err(CoreError::Validation(
            "bedroom_count must not be negative".into(),
        ));
    }
    Ok(())
}

/// Between 0 and 10 inclusive, at most one decimal place.
pub fn validate_review_score(score: Decimal) -> Result<(), CoreError> {
    if score < Decimal::ZERO || score > Decimal::TEN {
        return Err(CoreError::Validation(format!(
            "review_score {score} must be between 0 and 10"
        )));
    }
    check_scale("review_score", score, REVIEW_SCORE_SCALE)
}

/// Non-negative, below 10^8, at most two decimal places.
pub fn validate_usd_rate(rate: Decimal) -> Result<(), CoreError> {
    if rate < Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "usd_rate {rate} must not be negative"
        )));
    }
    if rate >= Decimal::from(USD_RATE_LIMIT) {
        return Err(CoreError::Validation(format!(
            "usd_rate {rate} must be below {USD_RATE_LIMIT}"
        )));
    }
    check_scale("usd_rate", rate, USD_RATE_SCALE)
}

/// Human readable label, e.g. `"Lake House - Austin"`.
pub fn accommodation_label(title: &str, location_title: &str) -> String {
    format!("{title} - {location_title}")
}

fn check_scale(field: &str, value: Decimal, max_scale: u32) -> Result<(), CoreError> {
    if value.normalize().scale() > max_scale {
        return Err(CoreError::Validation(format!(
            "{field} {value} has more than {max_scale} decimal places"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Owner scoping
// ---------------------------------------------------------------------------

/// Whether `role`/`user_id` may see or change a listing owned by `owner_id`.
///
/// Admins manage every listing. Property owners only manage their own;
/// ownerless listings are admin-only.
pub fn can_manage(role: &str, user_id: DbId, owner_id: Option<DbId>) -> bool {
    role == ROLE_ADMIN || owner_id == Some(user_id)
}

/// Resolve the owner to store on create.
///
/// A missing owner defaults to the acting user. Only admins may assign a
/// listing to somebody else.
pub fn resolve_owner(
    role: &str,
    user_id: DbId,
    requested: Option<DbId>,
) -> Result<DbId, CoreError> {
    match requested {
        None => Ok(user_id),
        Some(owner) if owner == user_id || role == ROLE_ADMIN => Ok(owner),
        Some(_) => Err(CoreError::Forbidden(
            "Only admins can assign a listing to another user".into(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Localized descriptions
// ---------------------------------------------------------------------------

/// ISO 639-1 code: exactly two lowercase ASCII letters.
pub fn validate_language_code(language: &str) -> Result<(), CoreError> {
    if language.len() == 2 && language.chars().all(|c| c.is_ascii_lowercase()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid language code '{language}'. Expected two lowercase letters (ISO 639-1)"
        )))
    }
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "description must not be empty".into(),
        ));
    }
    Ok(())
}

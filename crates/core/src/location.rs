//! Location hierarchy levels and field validation.
//!
//! Locations form a country → state → city hierarchy. Cities normally hang
//! off a state but may also sit directly under a country.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of an externally assigned location id.
pub const MAX_LOCATION_ID_LEN: usize = 20;

/// Maximum length of a location title.
pub const MAX_LOCATION_TITLE_LEN: usize = 100;

/// Maximum length of a state abbreviation.
pub const MAX_STATE_ABBR_LEN: usize = 3;

/// Maximum length of the free-text city name.
pub const MAX_CITY_NAME_LEN: usize = 30;

/// Conventional depth of the hierarchy (country, state, city).
pub const MAX_HIERARCHY_DEPTH: usize = 3;

// ---------------------------------------------------------------------------
// LocationType
// ---------------------------------------------------------------------------

/// Hierarchy level of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Country,
    State,
    #[default]
    City,
}

impl LocationType {
    /// All levels, root first.
    pub const ALL: [LocationType; 3] = [
        LocationType::Country,
        LocationType::State,
        LocationType::City,
    ];

    /// The lowercase name stored in `locations.location_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Country => "country",
            LocationType::State => "state",
            LocationType::City => "city",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "country" => Ok(LocationType::Country),
            "state" => Ok(LocationType::State),
            "city" => Ok(LocationType::City),
            other => Err(CoreError::Validation(format!(
                "Invalid location type '{other}'. Must be one of: country, state, city"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Paths and labels
// ---------------------------------------------------------------------------

/// The path segment contributed by a location id (ids are case-insensitive).
pub fn path_segment(id: &str) -> String {
    id.to_lowercase()
}

/// Human readable label, e.g. `"Austin (city)"`.
pub fn location_label(title: &str, location_type: LocationType) -> String {
    format!("{title} ({location_type})")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Borrowed view of the writable location columns, used for validation.
#[derive(Debug, Clone, Copy)]
pub struct LocationFields<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub location_type: LocationType,
    pub parent_id: Option<&'a str>,
    pub country_code: &'a str,
    pub state_abbr: Option<&'a str>,
    pub city: Option<&'a str>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Validate the column constraints of a location before it is written.
pub fn validate_location(fields: &LocationFields<'_>) -> Result<(), CoreError> {
    validate_location_id(fields.id)?;
    validate_title(fields.title, MAX_LOCATION_TITLE_LEN)?;
    validate_country_code(fields.country_code)?;

    if let Some(abbr) = fields.state_abbr {
        if abbr.chars().count() > MAX_STATE_ABBR_LEN {
            return Err(CoreError::Validation(format!(
                "state_abbr must be at most {MAX_STATE_ABBR_LEN} characters"
            )));
        }
    }
    if let Some(city) = fields.city {
        if city.chars().count() > MAX_CITY_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "city must be at most {MAX_CITY_NAME_LEN} characters"
            )));
        }
    }

    validate_coordinates(fields.latitude, fields.longitude)?;

    if let Some(parent_id) = fields.parent_id {
        if fields.location_type == LocationType::Country {
            return Err(CoreError::Validation(
                "A country location cannot have a parent".into(),
            ));
        }
        if parent_id.eq_ignore_ascii_case(fields.id) {
            return Err(CoreError::Validation(
                "A location cannot be its own parent".into(),
            ));
        }
    }

    Ok(())
}

/// Validate an externally assigned location id.
pub fn validate_location_id(id: &str) -> Result<(), CoreError> {
    validate_external_id(id, "Location")
}

/// Shared rule for text primary keys: non-blank, bounded, no path separators.
pub(crate) fn validate_external_id(id: &str, entity: &str) -> Result<(), CoreError> {
    if id.trim().is_empty() {
        return Err(CoreError::Validation(format!("{entity} id must not be empty")));
    }
    if id.chars().count() > MAX_LOCATION_ID_LEN {
        return Err(CoreError::Validation(format!(
            "{entity} id must be at most {MAX_LOCATION_ID_LEN} characters"
        )));
    }
    if id.contains('/') || id.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "{entity} id must not contain '/' or whitespace"
        )));
    }
    Ok(())
}

/// Titles are required and bounded.
pub(crate) fn validate_title(title: &str, max: usize) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title must not be empty".into()));
    }
    if title.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "title must be at most {max} characters"
        )));
    }
    Ok(())
}

/// ISO 3166-1 alpha-2 style code: exactly two ASCII letters.
pub fn validate_country_code(code: &str) -> Result<(), CoreError> {
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid country code '{code}'. Expected two ASCII letters"
        )))
    }
}

/// Latitude in `[-90, 90]`, longitude in `[-180, 180]`.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), CoreError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(CoreError::Validation(format!(
            "latitude {latitude} is out of range [-90, 90]"
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(CoreError::Validation(format!(
            "longitude {longitude} is out of range [-180, 180]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn dhaka() -> LocationFields<'static> {
        LocationFields {
            id: "LOC001",
            title: "Test City",
            location_type: LocationType::City,
            parent_id: None,
            country_code: "BD",
            state_abbr: None,
            city: None,
            latitude: 23.8103,
            longitude: 90.4125,
        }
    }

    #[test]
    fn location_type_round_trips_through_str() {
        for level in LocationType::ALL {
            assert_eq!(level.as_str().parse::<LocationType>().unwrap(), level);
        }
    }

    #[test]
    fn unknown_location_type_is_rejected() {
        assert_matches!("region".parse::<LocationType>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn default_location_type_is_city() {
        assert_eq!(LocationType::default(), LocationType::City);
    }

    #[test]
    fn label_includes_type() {
        assert_eq!(
            location_label("Test City", LocationType::City),
            "Test City (city)"
        );
    }

    #[test]
    fn path_segment_lowercases() {
        assert_eq!(path_segment("USA"), "usa");
        assert_eq!(path_segment("Tx"), "tx");
    }

    #[test]
    fn valid_location_passes() {
        assert!(validate_location(&dhaka()).is_ok());
    }

    #[test]
    fn long_id_is_rejected() {
        let id = "x".repeat(21);
        let fields = LocationFields { id: &id, ..dhaka() };
        assert_matches!(validate_location(&fields), Err(CoreError::Validation(_)));
    }

    #[test]
    fn id_with_slash_is_rejected() {
        let fields = LocationFields {
            id: "us/tx",
            ..dhaka()
        };
        assert_matches!(validate_location(&fields), Err(CoreError::Validation(_)));
    }

    #[test]
    fn country_code_must_be_two_letters() {
        let fields = LocationFields {
            country_code: "BGD",
            ..dhaka()
        };
        assert_matches!(validate_location(&fields), Err(CoreError::Validation(_)));
    }

    #[test]
    fn latitude_out_of_range_is_rejected() {
        let fields = LocationFields {
            latitude: 91.0,
            ..dhaka()
        };
        assert_matches!(validate_location(&fields), Err(CoreError::Validation(_)));
    }

    #[test]
    fn country_with_parent_is_rejected() {
        let fields = LocationFields {
            location_type: LocationType::Country,
            parent_id: Some("earth"),
            ..dhaka()
        };
        assert_matches!(validate_location(&fields), Err(CoreError::Validation(_)));
    }

    #[test]
    fn self_parent_is_rejected_case_insensitively() {
        let fields = LocationFields {
            parent_id: Some("loc001"),
            ..dhaka()
        };
        assert_matches!(validate_location(&fields), Err(CoreError::Validation(_)));
    }

    #[test]
    fn state_abbr_length_is_bounded() {
        let fields = LocationFields {
            state_abbr: Some("TEXA"),
            ..dhaka()
        };
        assert_matches!(validate_location(&fields), Err(CoreError::Validation(_)));
    }
}

//! Location entity model and DTOs.

use lodging_core::error::CoreError;
use lodging_core::location::{location_label, LocationFields, LocationType};
use lodging_core::location_tree::TreeLocation;
use lodging_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A location row from the `locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: String,
    pub title: String,
    /// One of `country`, `state`, `city` (enforced by `ck_locations_type`).
    pub location_type: String,
    pub parent_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub country_code: String,
    pub state_abbr: Option<String>,
    pub city: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Location {
    pub fn kind(&self) -> Result<LocationType, CoreError> {
        self.location_type.parse()
    }

    /// e.g. `"Austin (city)"`.
    pub fn label(&self) -> String {
        match self.kind() {
            Ok(kind) => location_label(&self.title, kind),
            Err(_) => format!("{} ({})", self.title, self.location_type),
        }
    }

    /// Project the row onto the columns the hierarchy needs.
    pub fn to_tree_location(&self) -> Result<TreeLocation, CoreError> {
        Ok(TreeLocation {
            id: self.id.clone(),
            title: self.title.clone(),
            location_type: self.kind()?,
            parent_id: self.parent_id.clone(),
        })
    }
}

/// DTO for creating a location. Also the import/export record format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLocation {
    pub id: String,
    pub title: String,
    /// Defaults to `city` if omitted.
    #[serde(default)]
    pub location_type: LocationType,
    pub parent_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub country_code: String,
    pub state_abbr: Option<String>,
    pub city: Option<String>,
}

impl CreateLocation {
    pub fn fields(&self) -> LocationFields<'_> {
        LocationFields {
            id: &self.id,
            title: &self.title,
            location_type: self.location_type,
            parent_id: self.parent_id.as_deref(),
            country_code: &self.country_code,
            state_abbr: self.state_abbr.as_deref(),
            city: self.city.as_deref(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn to_tree_location(&self) -> TreeLocation {
        TreeLocation {
            id: self.id.clone(),
            title: self.title.clone(),
            location_type: self.location_type,
            parent_id: self.parent_id.clone(),
        }
    }
}

impl TryFrom<&Location> for CreateLocation {
    type Error = CoreError;

    fn try_from(row: &Location) -> Result<Self, Self::Error> {
        Ok(CreateLocation {
            id: row.id.clone(),
            title: row.title.clone(),
            location_type: row.kind()?,
            parent_id: row.parent_id.clone(),
            latitude: row.latitude,
            longitude: row.longitude,
            country_code: row.country_code.clone(),
            state_abbr: row.state_abbr.clone(),
            city: row.city.clone(),
        })
    }
}

/// DTO for updating an existing location. All fields are optional.
///
/// `parent_id` can be moved to another parent but not cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLocation {
    pub title: Option<String>,
    pub location_type: Option<LocationType>,
    pub parent_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub country_code: Option<String>,
    pub state_abbr: Option<String>,
    pub city: Option<String>,
}

impl UpdateLocation {
    /// Merge the patch over `current` to obtain the row as it would be stored.
    pub fn apply_to(&self, current: &Location) -> Result<CreateLocation, CoreError> {
        let mut merged = CreateLocation::try_from(current)?;
        if let Some(title) = &self.title {
            merged.title = title.clone();
        }
        if let Some(kind) = self.location_type {
            merged.location_type = kind;
        }
        if let Some(parent_id) = &self.parent_id {
            merged.parent_id = Some(parent_id.clone());
        }
        if let Some(latitude) = self.latitude {
            merged.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            merged.longitude = longitude;
        }
        if let Some(code) = &self.country_code {
            merged.country_code = code.clone();
        }
        if let Some(abbr) = &self.state_abbr {
            merged.state_abbr = Some(abbr.clone());
        }
        if let Some(city) = &self.city {
            merged.city = Some(city.clone());
        }
        Ok(merged)
    }
}

/// Query filters for listing locations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationFilter {
    pub location_type: Option<LocationType>,
    pub country_code: Option<String>,
    /// Case-insensitive match on title, country code, state abbreviation or city.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

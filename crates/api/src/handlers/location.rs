//! Handlers for the `/locations` resource.
//!
//! Reads are public. Writes, export and import require the admin role.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lodging_core::error::CoreError;
use lodging_core::location::validate_location;
use lodging_core::location_tree::{LocationTree, TreeLocation};
use lodging_db::models::location::{CreateLocation, Location, LocationFilter, UpdateLocation};
use lodging_db::repositories::{AccommodationImageRepo, LocationRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of `POST /locations/import`.
#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load every location projected onto the columns the hierarchy needs.
pub(crate) async fn load_tree_locations(pool: &sqlx::PgPool) -> AppResult<Vec<TreeLocation>> {
    let rows = LocationRepo::list_all(pool).await?;
    let locations = rows
        .iter()
        .map(Location::to_tree_location)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(locations)
}

async fn find_or_404(pool: &sqlx::PgPool, id: &str) -> AppResult<Location> {
    LocationRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Location", id)))
}

fn missing_parent(parent_id: &str) -> AppError {
    AppError::Core(CoreError::Validation(format!(
        "Parent location '{parent_id}' does not exist"
    )))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/locations
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateLocation>,
) -> AppResult<(StatusCode, Json<Location>)> {
    validate_location(&input.fields())?;

    if LocationRepo::find_by_id(&state.pool, &input.id).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Location '{}' already exists",
            input.id
        ))));
    }
    if let Some(parent_id) = input.parent_id.as_deref() {
        if LocationRepo::find_by_id(&state.pool, parent_id).await?.is_none() {
            return Err(missing_parent(parent_id));
        }
    }

    let location = LocationRepo::create(&state.pool, &input).await?;
    tracing::info!(
        location_id = %location.id,
        label = %location.label(),
        admin_id = admin.user_id,
        "Location created"
    );
    Ok((StatusCode::CREATED, Json(location)))
}

/// GET /api/v1/locations
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<LocationFilter>,
) -> AppResult<Json<Vec<Location>>> {
    let locations = LocationRepo::list(&state.pool, &filter).await?;
    Ok(Json(locations))
}

/// GET /api/v1/locations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Location>> {
    Ok(Json(find_or_404(&state.pool, &id).await?))
}

/// GET /api/v1/locations/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Location>>> {
    find_or_404(&state.pool, &id).await?;
    let children = LocationRepo::list_children(&state.pool, &id).await?;
    Ok(Json(children))
}

/// PUT /api/v1/locations/{id}
///
/// Re-parenting is checked against the whole hierarchy so a location can
/// never end up beneath one of its own descendants.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(input): Json<UpdateLocation>,
) -> AppResult<Json<Location>> {
    let current = find_or_404(&state.pool, &id).await?;
    let merged = input.apply_to(&current)?;
    validate_location(&merged.fields())?;

    if let Some(new_parent) = input.parent_id.as_deref() {
        let tree = LocationTree::from_locations(load_tree_locations(&state.pool).await?)
            .map_err(|e| AppError::Core(CoreError::Internal(e.to_string())))?;
        if tree.get(new_parent).is_none() {
            return Err(missing_parent(new_parent));
        }
        if tree.would_create_cycle(&id, new_parent) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Moving '{id}' under '{new_parent}' would create a cycle"
            ))));
        }
    }

    let location = LocationRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Location", &id)))?;
    tracing::info!(location_id = %id, admin_id = admin.user_id, "Location updated");
    Ok(Json(location))
}

/// DELETE /api/v1/locations/{id}
///
/// Descendant locations and their accommodations are removed with it, and
/// the stored files of the cascaded image rows are deleted afterwards.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let images = AccommodationImageRepo::list_under_location(&state.pool, &id).await?;

    if !LocationRepo::delete(&state.pool, &id).await? {
        return Err(AppError::Core(CoreError::not_found("Location", id)));
    }

    for image in &images {
        if let Err(e) = state.storage.delete(&image.image_path).await {
            tracing::warn!(
                image_path = %image.image_path,
                error = %e,
                "Failed to remove image file of deleted location"
            );
        }
    }

    tracing::info!(
        location_id = %id,
        images = images.len(),
        admin_id = admin.user_id,
        "Location deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/locations/export
///
/// Every location in import format, parents before children.
pub async fn export(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<CreateLocation>>> {
    let rows = LocationRepo::list_all(&state.pool).await?;
    let mut records = rows
        .iter()
        .map(CreateLocation::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let tree = LocationTree::from_locations(records.iter().map(CreateLocation::to_tree_location))
        .map_err(|e| AppError::Core(CoreError::Internal(e.to_string())))?;
    records.sort_by_key(|r| tree.depth_of(&r.id).unwrap_or(0));

    Ok(Json(records))
}

/// POST /api/v1/locations/import
///
/// Upserts by id. The batch is checked together with the stored hierarchy
/// (unknown parents, duplicate ids, cycles) and written in one transaction,
/// parents first.
pub async fn import(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut records): Json<Vec<CreateLocation>>,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    for record in &records {
        validate_location(&record.fields()).map_err(|e| match e {
            CoreError::Validation(msg) => {
                CoreError::Validation(format!("Location '{}': {msg}", record.id))
            }
            other => other,
        })?;
    }

    let incoming: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
    let stored = load_tree_locations(&state.pool).await?;
    let combined = stored
        .into_iter()
        .filter(|l| !incoming.contains(l.id.as_str()))
        .chain(records.iter().map(CreateLocation::to_tree_location));
    let tree = LocationTree::from_locations(combined)
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    records.sort_by_key(|r| tree.depth_of(&r.id).unwrap_or(0));
    LocationRepo::upsert_many(&state.pool, &records).await?;

    tracing::info!(count = records.len(), admin_id = admin.user_id, "Locations imported");
    Ok(Json(DataResponse {
        data: ImportSummary {
            imported: records.len(),
        },
    }))
}

//! Handlers for the `/accommodations` resource.
//!
//! Every route requires authentication. Property owners only see and change
//! their own listings; admins manage all of them. A listing the caller may
//! not manage is reported as not found.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lodging_core::accommodation::{
    accommodation_label, can_manage, resolve_owner, validate_accommodation, AccommodationFields,
};
use lodging_core::error::CoreError;
use lodging_db::models::accommodation::{
    Accommodation, AccommodationFilter, CreateAccommodation, UpdateAccommodation,
};
use lodging_db::models::location::Location;
use lodging_db::repositories::{AccommodationImageRepo, AccommodationRepo, LocationRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load an accommodation the caller is allowed to manage.
pub(crate) async fn find_managed(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<Accommodation> {
    AccommodationRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|a| can_manage(&user.role, user.user_id, a.user_id))
        .ok_or_else(|| AppError::Core(CoreError::not_found("Accommodation", id)))
}

/// Resolve the referenced location; an unknown id is a validation error.
async fn ensure_location_exists(state: &AppState, location_id: &str) -> AppResult<Location> {
    LocationRepo::find_by_id(&state.pool, location_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Location '{location_id}' does not exist"
            )))
        })
}

/// Validate the row as it will look once `patch` is applied.
fn validate_patch(current: &Accommodation, patch: &UpdateAccommodation) -> Result<(), CoreError> {
    validate_accommodation(&AccommodationFields {
        id: &current.id,
        title: patch.title.as_deref().unwrap_or(&current.title),
        country_code: patch.country_code.as_deref().unwrap_or(&current.country_code),
        feed: patch.feed.unwrap_or(current.feed),
        bedroom_count: patch.bedroom_count.unwrap_or(current.bedroom_count),
        review_score: patch.review_score.unwrap_or(current.review_score),
        usd_rate: patch.usd_rate.unwrap_or(current.usd_rate),
        latitude: patch.latitude.unwrap_or(current.latitude),
        longitude: patch.longitude.unwrap_or(current.longitude),
        amenities: match &patch.amenities {
            Some(replacement) => replacement.as_ref(),
            None => current.amenities.as_ref(),
        },
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/accommodations
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateAccommodation>,
) -> AppResult<(StatusCode, Json<Accommodation>)> {
    validate_accommodation(&input.fields())?;
    let owner_id = resolve_owner(&user.role, user.user_id, input.user_id)?;

    if AccommodationRepo::find_by_id(&state.pool, &input.id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Accommodation '{}' already exists",
            input.id
        ))));
    }
    let location = ensure_location_exists(&state, &input.location_id).await?;

    let accommodation = AccommodationRepo::create(&state.pool, &input, owner_id).await?;
    tracing::info!(
        accommodation_id = %accommodation.id,
        label = %accommodation_label(&accommodation.title, &location.title),
        owner_id,
        user_id = user.user_id,
        "Accommodation created"
    );
    Ok((StatusCode::CREATED, Json(accommodation)))
}

/// GET /api/v1/accommodations
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<AccommodationFilter>,
) -> AppResult<Json<Vec<Accommodation>>> {
    let accommodations = AccommodationRepo::list(&state.pool, &filter, user.owner_scope()).await?;
    Ok(Json(accommodations))
}

/// GET /api/v1/accommodations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> AppResult<Json<Accommodation>> {
    Ok(Json(find_managed(&state, &user, &id).await?))
}

/// PUT /api/v1/accommodations/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(input): Json<UpdateAccommodation>,
) -> AppResult<Json<Accommodation>> {
    let current = find_managed(&state, &user, &id).await?;
    validate_patch(&current, &input)?;
    if let Some(location_id) = input.location_id.as_deref() {
        ensure_location_exists(&state, location_id).await?;
    }

    let accommodation = AccommodationRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Accommodation", &id)))?;
    tracing::info!(accommodation_id = %id, user_id = user.user_id, "Accommodation updated");
    Ok(Json(accommodation))
}

/// DELETE /api/v1/accommodations/{id}
///
/// Image rows cascade; their stored files are removed afterwards.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    find_managed(&state, &user, &id).await?;
    let images = AccommodationImageRepo::list_by_accommodation(&state.pool, &id).await?;

    if !AccommodationRepo::delete(&state.pool, &id).await? {
        return Err(AppError::Core(CoreError::not_found("Accommodation", id)));
    }

    for image in &images {
        if let Err(e) = state.storage.delete(&image.image_path).await {
            tracing::warn!(
                image_path = %image.image_path,
                error = %e,
                "Failed to remove image file of deleted accommodation"
            );
        }
    }

    tracing::info!(
        accommodation_id = %id,
        images = images.len(),
        user_id = user.user_id,
        "Accommodation deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

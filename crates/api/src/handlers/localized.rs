//! Handlers for `/accommodations/{id}/localized`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lodging_core::accommodation::{validate_description, validate_language_code};
use lodging_core::error::CoreError;
use lodging_core::types::DbId;
use lodging_db::models::localized_accommodation::{
    CreateLocalizedAccommodation, LocalizedAccommodation, UpdateLocalizedAccommodation,
};
use lodging_db::repositories::LocalizedAccommodationRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::accommodation::find_managed;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("LocalizedAccommodation", id))
}

/// POST /api/v1/accommodations/{id}/localized
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(accommodation_id): Path<String>,
    Json(input): Json<CreateLocalizedAccommodation>,
) -> AppResult<(StatusCode, Json<LocalizedAccommodation>)> {
    find_managed(&state, &user, &accommodation_id).await?;
    validate_language_code(&input.language)?;
    validate_description(&input.description)?;

    let localized =
        LocalizedAccommodationRepo::create(&state.pool, &accommodation_id, &input).await?;
    Ok((StatusCode::CREATED, Json(localized)))
}

/// GET /api/v1/accommodations/{id}/localized
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(accommodation_id): Path<String>,
) -> AppResult<Json<Vec<LocalizedAccommodation>>> {
    find_managed(&state, &user, &accommodation_id).await?;
    let rows =
        LocalizedAccommodationRepo::list_by_accommodation(&state.pool, &accommodation_id).await?;
    Ok(Json(rows))
}

/// GET /api/v1/accommodations/{id}/localized/{localized_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((accommodation_id, id)): Path<(String, DbId)>,
) -> AppResult<Json<LocalizedAccommodation>> {
    find_managed(&state, &user, &accommodation_id).await?;
    let localized = LocalizedAccommodationRepo::find_by_id(&state.pool, &accommodation_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(localized))
}

/// PUT /api/v1/accommodations/{id}/localized/{localized_id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((accommodation_id, id)): Path<(String, DbId)>,
    Json(input): Json<UpdateLocalizedAccommodation>,
) -> AppResult<Json<LocalizedAccommodation>> {
    find_managed(&state, &user, &accommodation_id).await?;
    if let Some(language) = input.language.as_deref() {
        validate_language_code(language)?;
    }
    if let Some(description) = input.description.as_deref() {
        validate_description(description)?;
    }

    let localized = LocalizedAccommodationRepo::update(&state.pool, &accommodation_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(localized))
}

/// DELETE /api/v1/accommodations/{id}/localized/{localized_id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((accommodation_id, id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    find_managed(&state, &user, &accommodation_id).await?;
    if LocalizedAccommodationRepo::delete(&state.pool, &accommodation_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

//! Handlers for `/accommodations/{id}/images`.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use lodging_core::error::CoreError;
use lodging_core::image_naming::{image_upload_path, validate_image_extension};
use lodging_core::types::DbId;
use lodging_db::models::accommodation_image::{AccommodationImage, CreateAccommodationImage};
use lodging_db::repositories::AccommodationImageRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::accommodation::find_managed;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// GET /api/v1/accommodations/{id}/images
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(accommodation_id): Path<String>,
) -> AppResult<Json<Vec<AccommodationImage>>> {
    find_managed(&state, &user, &accommodation_id).await?;
    let images =
        AccommodationImageRepo::list_by_accommodation(&state.pool, &accommodation_id).await?;
    Ok(Json(images))
}

/// POST /api/v1/accommodations/{id}/images
///
/// Accepts a multipart form with a required `file` field. The file is stored
/// under `accommodations/{id}/images/` with a slugged, uniquely suffixed name.
pub async fn upload(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(accommodation_id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<AccommodationImage>)> {
    find_managed(&state, &user, &accommodation_id).await?;

    let mut file_data: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("The 'file' field has no file name".into()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file_data = Some((filename, data.to_vec()));
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    validate_image_extension(&filename)?;
    if data.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Uploaded file is empty".into(),
        )));
    }

    let relative_path = image_upload_path(&accommodation_id, &filename);
    let stored = state.storage.save(&relative_path, &data).await?;

    let input = CreateAccommodationImage {
        accommodation_id: accommodation_id.clone(),
        image_path: stored.relative_path,
    };
    let image = match AccommodationImageRepo::create(&state.pool, &input).await {
        Ok(image) => image,
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(&input.image_path).await {
                tracing::warn!(
                    image_path = %input.image_path,
                    error = %cleanup,
                    "Failed to remove orphaned upload"
                );
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        accommodation_id = %accommodation_id,
        image_id = image.id,
        image_path = %image.image_path,
        size_bytes = stored.size_bytes,
        "Accommodation image uploaded"
    );
    Ok((StatusCode::CREATED, Json(image)))
}

/// DELETE /api/v1/accommodations/{id}/images/{image_id}
///
/// Removes the row, then the stored file. A file that is already gone is
/// not an error.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((accommodation_id, image_id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    find_managed(&state, &user, &accommodation_id).await?;
    let image = AccommodationImageRepo::find_by_id(&state.pool, &accommodation_id, image_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("AccommodationImage", image_id)))?;

    AccommodationImageRepo::delete(&state.pool, image.id).await?;
    if !state.storage.delete(&image.image_path).await? {
        tracing::debug!(image_path = %image.image_path, "Image file was already missing");
    }

    tracing::info!(accommodation_id = %accommodation_id, image_id, "Accommodation image deleted");
    Ok(StatusCode::NO_CONTENT)
}

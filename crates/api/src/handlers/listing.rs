//! Public, read-only view of published accommodations.

use axum::extract::{Path, Query, State};
use axum::Json;
use lodging_core::error::CoreError;
use lodging_db::models::accommodation::{Accommodation, AccommodationFilter};
use lodging_db::repositories::AccommodationRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for `GET /listings`. Drafts are never included.
#[derive(Debug, Deserialize)]
pub struct ListingParams {
    pub location_id: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/listings
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> AppResult<Json<Vec<Accommodation>>> {
    let filter = AccommodationFilter {
        published: Some(true),
        location_id: params.location_id,
        search: params.search,
        limit: params.limit,
        offset: params.offset,
    };
    let listings = AccommodationRepo::list(&state.pool, &filter, None).await?;
    Ok(Json(listings))
}

/// GET /api/v1/listings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Accommodation>> {
    let listing = AccommodationRepo::find_published(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Listing", &id)))?;
    Ok(Json(listing))
}

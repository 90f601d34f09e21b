//! Route definitions for the `/accommodations` resource and its images and
//! localized descriptions.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{accommodation, image, localized};
use crate::state::AppState;

/// Upper bound on an image upload request body.
const MAX_IMAGE_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Routes mounted at `/accommodations`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
///
/// GET    /{id}/images                       -> image::list
/// POST   /{id}/images                       -> image::upload (multipart)
/// DELETE /{id}/images/{image_id}            -> image::delete
///
/// GET    /{id}/localized                    -> localized::list
/// POST   /{id}/localized                    -> localized::create
/// GET    /{id}/localized/{localized_id}     -> localized::get_by_id
/// PUT    /{id}/localized/{localized_id}     -> localized::update
/// DELETE /{id}/localized/{localized_id}     -> localized::delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(accommodation::list).post(accommodation::create))
        .route(
            "/{id}",
            get(accommodation::get_by_id)
                .put(accommodation::update)
                .delete(accommodation::delete),
        )
        .route(
            "/{id}/images",
            get(image::list)
                .post(image::upload)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_UPLOAD_BYTES)),
        )
        .route("/{id}/images/{image_id}", delete(image::delete))
        .route(
            "/{id}/localized",
            get(localized::list).post(localized::create),
        )
        .route(
            "/{id}/localized/{localized_id}",
            get(localized::get_by_id)
                .put(localized::update)
                .delete(localized::delete),
        )
}

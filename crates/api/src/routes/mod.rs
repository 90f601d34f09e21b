pub mod accommodation;
pub mod admin;
pub mod auth;
pub mod health;
pub mod listing;
pub mod location;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
///
/// /sitemap                                         preview (public)
/// /admin/sitemap                                   publish artifact (POST, admin)
///
/// /locations                                       list, create (create: admin)
/// /locations/export                                export (admin)
/// /locations/import                                import (POST, admin)
/// /locations/{id}                                  get, update, delete (writes: admin)
/// /locations/{id}/children                         direct children
///
/// /listings                                        published listings (public)
/// /listings/{id}                                   published listing (public)
///
/// /accommodations                                  list, create (owner-scoped)
/// /accommodations/{id}                             get, update, delete
/// /accommodations/{id}/images                      list, upload (multipart)
/// /accommodations/{id}/images/{image_id}           delete
/// /accommodations/{id}/localized                   list, create
/// /accommodations/{id}/localized/{localized_id}    get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .route("/sitemap", get(handlers::sitemap::preview))
        .nest("/admin", admin::router())
        .nest("/locations", location::router())
        .nest("/listings", listing::router())
        .nest("/accommodations", accommodation::router())
}

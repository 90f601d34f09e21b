//! Route definitions for the `/locations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::location;
use crate::state::AppState;

/// Routes mounted at `/locations`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /export          -> export
/// POST   /import          -> import
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// GET    /{id}/children   -> list_children
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(location::list).post(location::create))
        .route("/export", get(location::export))
        .route("/import", post(location::import))
        .route(
            "/{id}",
            get(location::get_by_id)
                .put(location::update)
                .delete(location::delete),
        )
        .route("/{id}/children", get(location::list_children))
}

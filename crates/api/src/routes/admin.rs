//! Route definitions for admin-only operations.

use axum::routing::post;
use axum::Router;

use crate::handlers::sitemap;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST /sitemap -> publish
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/sitemap", post(sitemap::publish))
}

//! Shared response envelope types for API handlers.
//!
//! Entity endpoints return the entity itself; operation summaries (import,
//! sitemap publishing) are wrapped in a `{ "data": ... }` envelope.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: summary }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

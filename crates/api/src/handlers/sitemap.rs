//! Handlers for sitemap preview and publishing.

use axum::extract::State;
use axum::Json;
use lodging_core::sitemap::{
    build_sitemap_from_locations, publish_sitemap, Sitemap, SitemapAnomaly, SitemapEntry,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::location::load_tree_locations;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of `POST /admin/sitemap`.
#[derive(Debug, Serialize)]
pub struct PublishSummary {
    pub path: String,
    pub countries: usize,
    pub bytes_written: usize,
    pub anomalies: Vec<SitemapAnomaly>,
}

async fn build_current(state: &AppState) -> AppResult<Sitemap> {
    let locations = load_tree_locations(&state.pool).await?;
    let sitemap = build_sitemap_from_locations(locations)?;
    for anomaly in &sitemap.anomalies {
        let SitemapAnomaly::UnexpectedDepth {
            location_id,
            depth,
            skipped_children,
        } = anomaly;
        tracing::warn!(
            location_id = %location_id,
            depth,
            skipped_children,
            "State nested too deep; children left out of the sitemap"
        );
    }
    Ok(sitemap)
}

/// GET /api/v1/sitemap
///
/// The sitemap as it would be published from the current data.
pub async fn preview(State(state): State<AppState>) -> AppResult<Json<Vec<SitemapEntry>>> {
    let sitemap = build_current(&state).await?;
    Ok(Json(sitemap.entries))
}

/// POST /api/v1/admin/sitemap
///
/// Rebuild the sitemap and overwrite the configured artifact.
pub async fn publish(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DataResponse<PublishSummary>>> {
    let sitemap = build_current(&state).await?;
    let target = &state.config.sitemap_path;
    let bytes_written = publish_sitemap(state.storage.as_ref(), target, &sitemap).await?;

    tracing::info!(
        path = %target.display(),
        countries = sitemap.entries.len(),
        bytes_written,
        admin_id = admin.user_id,
        "Sitemap published"
    );

    Ok(Json(DataResponse {
        data: PublishSummary {
            path: target.display().to_string(),
            countries: sitemap.entries.len(),
            bytes_written,
            anomalies: sitemap.anomalies,
        },
    }))
}

use std::sync::Arc;

use lodging_core::storage::FileStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lodging_db::DbPool,
    /// Server configuration (JWT settings, sitemap target, password policy).
    pub config: Arc<ServerConfig>,
    /// Storage for uploaded images and the sitemap artifact.
    pub storage: Arc<dyn FileStorage>,
}

//! One-shot sitemap generation.
//!
//! Loads every location, builds the country/state/city sitemap and
//! overwrites the JSON artifact at `SITEMAP_PATH`.

use std::path::PathBuf;

use anyhow::Context;
use lodging_core::location_tree::TreeLocation;
use lodging_core::sitemap::{build_sitemap_from_locations, publish_sitemap, SitemapAnomaly};
use lodging_core::storage::LocalFileStorage;
use lodging_db::repositories::LocationRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lodging_sitemap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let media_root =
        PathBuf::from(std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".into()));
    let sitemap_path =
        PathBuf::from(std::env::var("SITEMAP_PATH").unwrap_or_else(|_| "sitemap.json".into()));

    let pool = lodging_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;

    let rows = LocationRepo::list_all(&pool)
        .await
        .context("Failed to load locations")?;
    let locations = rows
        .iter()
        .map(|row| row.to_tree_location())
        .collect::<Result<Vec<TreeLocation>, _>>()
        .context("Stored location has an unknown type")?;
    tracing::debug!(count = locations.len(), "Loaded locations");

    let sitemap = build_sitemap_from_locations(locations).context("Failed to build sitemap")?;
    for SitemapAnomaly::UnexpectedDepth {
        location_id,
        depth,
        skipped_children,
    } in &sitemap.anomalies
    {
        tracing::warn!(
            location_id = %location_id,
            depth,
            skipped_children,
            "State nested too deep; children left out of the sitemap"
        );
    }

    let storage = LocalFileStorage::new(media_root);
    let bytes_written = publish_sitemap(&storage, &sitemap_path, &sitemap)
        .await
        .with_context(|| format!("Failed to write {}", sitemap_path.display()))?;

    tracing::info!(
        path = %sitemap_path.display(),
        countries = sitemap.entries.len(),
        bytes_written,
        "Sitemap generated"
    );
    Ok(())
}

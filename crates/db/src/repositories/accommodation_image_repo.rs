//! Repository for the `accommodation_images` table.

use lodging_core::types::DbId;
use sqlx::PgPool;

use crate::models::accommodation_image::{AccommodationImage, CreateAccommodationImage};

const COLUMNS: &str = "id, accommodation_id, image_path, uploaded_at";

/// Provides CRUD operations for accommodation images.
pub struct AccommodationImageRepo;

impl AccommodationImageRepo {
    /// Record a stored upload.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAccommodationImage,
    ) -> Result<AccommodationImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO accommodation_images (accommodation_id, image_path)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AccommodationImage>(&query)
            .bind(&input.accommodation_id)
            .bind(&input.image_path)
            .fetch_one(pool)
            .await
    }

    /// All images of one accommodation in upload order.
    pub async fn list_by_accommodation(
        pool: &PgPool,
        accommodation_id: &str,
    ) -> Result<Vec<AccommodationImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM accommodation_images
             WHERE accommodation_id = $1
             ORDER BY uploaded_at, id"
        );
        sqlx::query_as::<_, AccommodationImage>(&query)
            .bind(accommodation_id)
            .fetch_all(pool)
            .await
    }

    /// Images of every accommodation located at `location_id` or any of
    /// its descendant locations.
    pub async fn list_under_location(
        pool: &PgPool,
        location_id: &str,
    ) -> Result<Vec<AccommodationImage>, sqlx::Error> {
        let query = format!(
            "WITH RECURSIVE subtree AS (
                 SELECT id FROM locations WHERE id = $1
                 UNION
                 SELECT l.id FROM locations l JOIN subtree s ON l.parent_id = s.id
             )
             SELECT {COLUMNS} FROM accommodation_images
             WHERE accommodation_id IN (
                 SELECT a.id FROM accommodations a JOIN subtree s ON a.location_id = s.id
             )
             ORDER BY uploaded_at, id"
        );
        sqlx::query_as::<_, AccommodationImage>(&query)
            .bind(location_id)
            .fetch_all(pool)
            .await
    }

    /// Find an image belonging to `accommodation_id`.
    pub async fn find_by_id(
        pool: &PgPool,
        accommodation_id: &str,
        id: DbId,
    ) -> Result<Option<AccommodationImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM accommodation_images
             WHERE id = $1 AND accommodation_id = $2"
        );
        sqlx::query_as::<_, AccommodationImage>(&query)
            .bind(id)
            .bind(accommodation_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an image row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accommodation_images WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

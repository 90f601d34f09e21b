//! Repository for the `localized_accommodations` table.

use lodging_core::types::DbId;
use sqlx::PgPool;

use crate::models::localized_accommodation::{
    CreateLocalizedAccommodation, LocalizedAccommodation, UpdateLocalizedAccommodation,
};

const COLUMNS: &str =
    "id, accommodation_id, language, description, policy, created_at, updated_at";

/// Provides CRUD operations for localized descriptions, always scoped to
/// their accommodation.
pub struct LocalizedAccommodationRepo;

impl LocalizedAccommodationRepo {
    pub async fn create(
        pool: &PgPool,
        accommodation_id: &str,
        input: &CreateLocalizedAccommodation,
    ) -> Result<LocalizedAccommodation, sqlx::Error> {
        let query = format!(
            "INSERT INTO localized_accommodations
                (accommodation_id, language, description, policy)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LocalizedAccommodation>(&query)
            .bind(accommodation_id)
            .bind(&input.language)
            .bind(&input.description)
            .bind(&input.policy)
            .fetch_one(pool)
            .await
    }

    /// All descriptions of one accommodation, ordered by language.
    pub async fn list_by_accommodation(
        pool: &PgPool,
        accommodation_id: &str,
    ) -> Result<Vec<LocalizedAccommodation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM localized_accommodations
             WHERE accommodation_id = $1
             ORDER BY language"
        );
        sqlx::query_as::<_, LocalizedAccommodation>(&query)
            .bind(accommodation_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        accommodation_id: &str,
        id: DbId,
    ) -> Result<Option<LocalizedAccommodation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM localized_accommodations
             WHERE id = $1 AND accommodation_id = $2"
        );
        sqlx::query_as::<_, LocalizedAccommodation>(&query)
            .bind(id)
            .bind(accommodation_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if the row does not exist
    /// under `accommodation_id`.
    pub async fn update(
        pool: &PgPool,
        accommodation_id: &str,
        id: DbId,
        input: &UpdateLocalizedAccommodation,
    ) -> Result<Option<LocalizedAccommodation>, sqlx::Error> {
        let query = format!(
            "UPDATE localized_accommodations SET
                language = COALESCE($3, language),
                description = COALESCE($4, description),
                policy = COALESCE($5, policy),
                updated_at = NOW()
             WHERE id = $1 AND accommodation_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LocalizedAccommodation>(&query)
            .bind(id)
            .bind(accommodation_id)
            .bind(&input.language)
            .bind(&input.description)
            .bind(&input.policy)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(
        pool: &PgPool,
        accommodation_id: &str,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM localized_accommodations WHERE id = $1 AND accommodation_id = $2",
        )
        .bind(id)
        .bind(accommodation_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

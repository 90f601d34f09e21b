//! Repository for the `accommodations` table.

use lodging_core::search::{clamp_limit, clamp_offset, ilike_pattern, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use lodging_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::accommodation::{
    Accommodation, AccommodationFilter, CreateAccommodation, UpdateAccommodation,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, feed, title, country_code, bedroom_count, review_score, usd_rate, \
                       latitude, longitude, location_id, amenities, user_id, published, \
                       created_at, updated_at";

/// Same columns qualified with the `a` alias for joined queries.
const ALIASED_COLUMNS: &str = "a.id, a.feed, a.title, a.country_code, a.bedroom_count, \
                               a.review_score, a.usd_rate, a.latitude, a.longitude, \
                               a.location_id, a.amenities, a.user_id, a.published, \
                               a.created_at, a.updated_at";

/// Provides CRUD operations for accommodations.
pub struct AccommodationRepo;

impl AccommodationRepo {
    /// Insert a new accommodation owned by `owner_id`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAccommodation,
        owner_id: DbId,
    ) -> Result<Accommodation, sqlx::Error> {
        let query = format!(
            "INSERT INTO accommodations
                (id, feed, title, country_code, bedroom_count, review_score, usd_rate,
                 latitude, longitude, location_id, amenities, user_id, published)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Accommodation>(&query)
            .bind(&input.id)
            .bind(input.feed.unwrap_or(0))
            .bind(&input.title)
            .bind(&input.country_code)
            .bind(input.bedroom_count)
            .bind(input.review_score.unwrap_or(Decimal::ZERO))
            .bind(input.usd_rate)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.location_id)
            .bind(&input.amenities)
            .bind(owner_id)
            .bind(input.published.unwrap_or(false))
            .fetch_one(pool)
            .await
    }

    /// Find an accommodation by id, published or not.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Accommodation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accommodations WHERE id = $1");
        sqlx::query_as::<_, Accommodation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published accommodation by id.
    pub async fn find_published(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<Accommodation>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM accommodations WHERE id = $1 AND published = TRUE");
        sqlx::query_as::<_, Accommodation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List accommodations matching `filter`, newest first.
    ///
    /// When `owner` is `Some`, only that user's listings are returned.
    pub async fn list(
        pool: &PgPool,
        filter: &AccommodationFilter,
        owner: Option<DbId>,
    ) -> Result<Vec<Accommodation>, sqlx::Error> {
        let limit = clamp_limit(filter.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(filter.offset);
        let search = ilike_pattern(filter.search.as_deref());

        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if owner.is_some() {
            conditions.push(format!("a.user_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.published.is_some() {
            conditions.push(format!("a.published = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.location_id.is_some() {
            conditions.push(format!("a.location_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if search.is_some() {
            conditions.push(format!(
                "(a.title ILIKE ${bind_idx} OR a.country_code ILIKE ${bind_idx} \
                  OR l.title ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {ALIASED_COLUMNS} FROM accommodations a \
             JOIN locations l ON l.id = a.location_id \
             {where_clause} \
             ORDER BY a.created_at DESC, a.id \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Accommodation>(&query);
        if let Some(owner_id) = owner {
            q = q.bind(owner_id);
        }
        if let Some(published) = filter.published {
            q = q.bind(published);
        }
        if let Some(ref location_id) = filter.location_id {
            q = q.bind(location_id);
        }
        if let Some(ref pattern) = search {
            q = q.bind(pattern);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Update an accommodation. Only non-`None` fields in `input` are applied;
    /// `amenities: Some(None)` clears the column.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateAccommodation,
    ) -> Result<Option<Accommodation>, sqlx::Error> {
        let query = format!(
            "UPDATE accommodations SET
                feed = COALESCE($2, feed),
                title = COALESCE($3, title),
                country_code = COALESCE($4, country_code),
                bedroom_count = COALESCE($5, bedroom_count),
                review_score = COALESCE($6, review_score),
                usd_rate = COALESCE($7, usd_rate),
                latitude = COALESCE($8, latitude),
                longitude = COALESCE($9, longitude),
                location_id = COALESCE($10, location_id),
                amenities = CASE WHEN $11 THEN $12 ELSE amenities END,
                published = COALESCE($13, published),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Accommodation>(&query)
            .bind(id)
            .bind(input.feed)
            .bind(&input.title)
            .bind(&input.country_code)
            .bind(input.bedroom_count)
            .bind(input.review_score)
            .bind(input.usd_rate)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.location_id)
            .bind(input.amenities.is_some())
            .bind(input.amenities.as_ref().and_then(Option::as_ref))
            .bind(input.published)
            .fetch_optional(pool)
            .await
    }

    /// Delete an accommodation. Images and localized descriptions cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accommodations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

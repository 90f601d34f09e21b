//! Repository for the `locations` table.

use lodging_core::location::LocationType;
use lodging_core::search::{clamp_limit, clamp_offset, ilike_pattern, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use sqlx::PgPool;

use crate::models::location::{CreateLocation, Location, LocationFilter, UpdateLocation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, location_type, parent_id, latitude, longitude, \
                       country_code, state_abbr, city, created_at, updated_at";

/// Case-insensitive title, then exact title, then id; matches the
/// ordering of the in-memory hierarchy.
const TITLE_ORDER: &str = "LOWER(title), title, id";

/// Provides CRUD and hierarchy queries for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a new location, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLocation) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations
                (id, title, location_type, parent_id, latitude, longitude,
                 country_code, state_abbr, city)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(&input.id)
            .bind(&input.title)
            .bind(input.location_type.as_str())
            .bind(&input.parent_id)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.country_code)
            .bind(&input.state_abbr)
            .bind(&input.city)
            .fetch_one(pool)
            .await
    }

    /// Find a location by its id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List locations matching `filter`, ordered by title.
    pub async fn list(pool: &PgPool, filter: &LocationFilter) -> Result<Vec<Location>, sqlx::Error> {
        let limit = clamp_limit(filter.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(filter.offset);
        let search = ilike_pattern(filter.search.as_deref());

        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if filter.location_type.is_some() {
            conditions.push(format!("location_type = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.country_code.is_some() {
            conditions.push(format!("UPPER(country_code) = UPPER(${bind_idx})"));
            bind_idx += 1;
        }
        if search.is_some() {
            conditions.push(format!(
                "(title ILIKE ${bind_idx} OR country_code ILIKE ${bind_idx} \
                  OR state_abbr ILIKE ${bind_idx} OR city ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM locations {where_clause} \
             ORDER BY {TITLE_ORDER} \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Location>(&query);
        if let Some(kind) = filter.location_type {
            q = q.bind(kind.as_str());
        }
        if let Some(ref code) = filter.country_code {
            q = q.bind(code);
        }
        if let Some(ref pattern) = search {
            q = q.bind(pattern);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Every location, ordered by title. Used to build the hierarchy.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations ORDER BY {TITLE_ORDER}");
        sqlx::query_as::<_, Location>(&query).fetch_all(pool).await
    }

    /// Direct children of a location, ordered by title.
    pub async fn list_children(
        pool: &PgPool,
        parent_id: &str,
    ) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations WHERE parent_id = $1 ORDER BY {TITLE_ORDER}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Update a location. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET
                title = COALESCE($2, title),
                location_type = COALESCE($3, location_type),
                parent_id = COALESCE($4, parent_id),
                latitude = COALESCE($5, latitude),
                longitude = COALESCE($6, longitude),
                country_code = COALESCE($7, country_code),
                state_abbr = COALESCE($8, state_abbr),
                city = COALESCE($9, city),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.location_type.map(LocationType::as_str))
            .bind(&input.parent_id)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.country_code)
            .bind(&input.state_abbr)
            .bind(&input.city)
            .fetch_optional(pool)
            .await
    }

    /// Delete a location. Descendants and their accommodations cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert or replace many locations in one transaction.
    ///
    /// `records` must be ordered so that parents precede their children.
    pub async fn upsert_many(
        pool: &PgPool,
        records: &[CreateLocation],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut written = 0;
        for record in records {
            let result = sqlx::query(
                "INSERT INTO locations
                    (id, title, location_type, parent_id, latitude, longitude,
                     country_code, state_abbr, city)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 ON CONFLICT (id) DO UPDATE SET
                    title = EXCLUDED.title,
                    location_type = EXCLUDED.location_type,
                    parent_id = EXCLUDED.parent_id,
                    latitude = EXCLUDED.latitude,
                    longitude = EXCLUDED.longitude,
                    country_code = EXCLUDED.country_code,
                    state_abbr = EXCLUDED.state_abbr,
                    city = EXCLUDED.city,
                    updated_at = NOW()",
            )
            .bind(&record.id)
            .bind(&record.title)
            .bind(record.location_type.as_str())
            .bind(&record.parent_id)
            .bind(record.latitude)
            .bind(record.longitude)
            .bind(&record.country_code)
            .bind(&record.state_abbr)
            .bind(&record.city)
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }
}

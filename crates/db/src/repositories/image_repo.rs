//! Repository for the `images` table.

use pitch_core::types::DbId;
use sqlx::PgPool;

use crate::models::image::{CreateImage, Image, ImageFilter, UpdateImage};

const COLUMNS: &str = "id, file_path, title, category, tags, width, height, created_at, updated_at";

/// Provides CRUD operations for the image library.
pub struct ImageRepo;

impl ImageRepo {
    pub async fn create(pool: &PgPool, input: &CreateImage) -> Result<Image, sqlx::Error> {
        let query = format!(
            "INSERT INTO images (file_path, title, category, tags, width, height)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(&input.file_path)
            .bind(&input.title)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(input.width)
            .bind(input.height)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several images by id. Order is unspecified.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = ANY($1)");
        sqlx::query_as::<_, Image>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List images matching the picker filter, newest first.
    pub async fn list(pool: &PgPool, filter: &ImageFilter) -> Result<Vec<Image>, sqlx::Error> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()));
        let query = format!(
            "SELECT {COLUMNS} FROM images
             WHERE ($1::text IS NULL OR category = $1)
               AND ($2::text IS NULL
                    OR LOWER(COALESCE(title, '')) LIKE $2
                    OR EXISTS (SELECT 1 FROM UNNEST(tags) t WHERE LOWER(t) LIKE $2))
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(&filter.category)
            .bind(search)
            .fetch_all(pool)
            .await
    }

    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateImage) -> Result<Option<Image>, sqlx::Error> {
        let query = format!(
            "UPDATE images SET
                title = COALESCE($2, title),
                category = COALESCE($3, category),
                tags = COALESCE($4, tags),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.category)
            .bind(&input.tags)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

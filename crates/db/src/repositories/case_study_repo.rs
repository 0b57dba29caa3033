//! Repository for the `case_studies` table.

use pitch_core::types::DbId;
use sqlx::PgPool;

use crate::models::case_study::{CaseStudy, CreateCaseStudy, UpdateCaseStudy};

const COLUMNS: &str =
    "id, title, description, thumbnail_path, tags, cta_label, cta_url, created_at, updated_at";

/// Provides CRUD operations for case studies.
pub struct CaseStudyRepo;

impl CaseStudyRepo {
    pub async fn create(pool: &PgPool, input: &CreateCaseStudy) -> Result<CaseStudy, sqlx::Error> {
        let query = format!(
            "INSERT INTO case_studies (title, description, thumbnail_path, tags, cta_label, cta_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CaseStudy>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.thumbnail_path)
            .bind(&input.tags)
            .bind(&input.cta_label)
            .bind(&input.cta_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CaseStudy>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM case_studies WHERE id = $1");
        sqlx::query_as::<_, CaseStudy>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<CaseStudy>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM case_studies ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, CaseStudy>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCaseStudy,
    ) -> Result<Option<CaseStudy>, sqlx::Error> {
        let query = format!(
            "UPDATE case_studies SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                thumbnail_path = COALESCE($4, thumbnail_path),
                tags = COALESCE($5, tags),
                cta_label = COALESCE($6, cta_label),
                cta_url = COALESCE($7, cta_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CaseStudy>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.thumbnail_path)
            .bind(&input.tags)
            .bind(&input.cta_label)
            .bind(&input.cta_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM case_studies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

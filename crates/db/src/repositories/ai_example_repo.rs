//! Repository for the `ai_examples` table.

use pitch_core::generation::MAX_EXAMPLES;
use pitch_core::types::DbId;
use sqlx::PgPool;

use crate::models::ai_example::{AiExample, AiExampleFilter, CreateAiExample, UpdateAiExample};

const COLUMNS: &str =
    "id, section_type, project_type, text, quality_score, usage_count, created_at, updated_at";

/// Provides CRUD and ranking queries for curated AI examples.
pub struct AiExampleRepo;

impl AiExampleRepo {
    pub async fn create(pool: &PgPool, input: &CreateAiExample) -> Result<AiExample, sqlx::Error> {
        let query = format!(
            "INSERT INTO ai_examples (section_type, project_type, text, quality_score)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AiExample>(&query)
            .bind(&input.section_type)
            .bind(&input.project_type)
            .bind(&input.text)
            .bind(input.quality_score)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AiExample>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ai_examples WHERE id = $1");
        sqlx::query_as::<_, AiExample>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List examples, best first.
    pub async fn list(pool: &PgPool, filter: &AiExampleFilter) -> Result<Vec<AiExample>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ai_examples
             WHERE ($1::text IS NULL OR section_type = $1)
               AND ($2::text IS NULL OR project_type = $2)
             ORDER BY quality_score DESC, id"
        );
        sqlx::query_as::<_, AiExample>(&query)
            .bind(&filter.section_type)
            .bind(&filter.project_type)
            .fetch_all(pool)
            .await
    }

    /// The highest-scored examples for a `(section_type, project_type)` pair.
    pub async fn top_for(
        pool: &PgPool,
        section_type: &str,
        project_type: &str,
    ) -> Result<Vec<AiExample>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ai_examples
             WHERE section_type = $1 AND project_type = $2
             ORDER BY quality_score DESC, id
             LIMIT $3"
        );
        sqlx::query_as::<_, AiExample>(&query)
            .bind(section_type)
            .bind(project_type)
            .bind(MAX_EXAMPLES as i64)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAiExample,
    ) -> Result<Option<AiExample>, sqlx::Error> {
        let query = format!(
            "UPDATE ai_examples SET
                section_type = COALESCE($2, section_type),
                project_type = COALESCE($3, project_type),
                text = COALESCE($4, text),
                quality_score = COALESCE($5, quality_score),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AiExample>(&query)
            .bind(id)
            .bind(&input.section_type)
            .bind(&input.project_type)
            .bind(&input.text)
            .bind(input.quality_score)
            .fetch_optional(pool)
            .await
    }

    /// Count one more use of each example.
    pub async fn increment_usage(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE ai_examples SET usage_count = usage_count + 1 WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ai_examples WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

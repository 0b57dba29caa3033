//! Repository for the `sections` table.

use pitch_core::types::DbId;
use sqlx::PgPool;

use crate::models::section::{CreateSection, Section, SectionWrite};

const COLUMNS: &str = "id, project_id, type, content, visible, order_index, created_at, updated_at";

/// Provides CRUD operations for project sections.
pub struct SectionRepo;

impl SectionRepo {
    pub async fn create(pool: &PgPool, input: &CreateSection) -> Result<Section, sqlx::Error> {
        let query = format!(
            "INSERT INTO sections (project_id, type, content, visible, order_index)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(input.project_id)
            .bind(&input.section_type)
            .bind(&input.content)
            .bind(input.visible)
            .bind(input.order_index)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Section>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sections WHERE id = $1");
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's sections in display order.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Section>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sections WHERE project_id = $1 ORDER BY order_index, id"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Write content, visibility and order. Returns `false` if the row is gone.
    pub async fn save(pool: &PgPool, id: DbId, input: &SectionWrite) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sections SET content = $2, visible = $3, order_index = $4, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.content)
        .bind(input.visible)
        .bind(input.order_index)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

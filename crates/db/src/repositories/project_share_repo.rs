//! Repository for the `project_shares` table.

use pitch_core::types::DbId;
use sqlx::PgPool;

use crate::models::project_share::ProjectShare;

const COLUMNS: &str = "id, project_id, token, created_at";

/// Share tokens, one per published project.
pub struct ProjectShareRepo;

impl ProjectShareRepo {
    pub async fn create(pool: &PgPool, project_id: DbId, token: &str) -> Result<ProjectShare, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_shares (project_id, token) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectShare>(&query)
            .bind(project_id)
            .bind(token)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_project(pool: &PgPool, project_id: DbId) -> Result<Option<ProjectShare>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_shares WHERE project_id = $1");
        sqlx::query_as::<_, ProjectShare>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<ProjectShare>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_shares WHERE token = $1");
        sqlx::query_as::<_, ProjectShare>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Revoke the project's token. Returns `false` if none existed.
    pub async fn delete_by_project(pool: &PgPool, project_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_shares WHERE project_id = $1")
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

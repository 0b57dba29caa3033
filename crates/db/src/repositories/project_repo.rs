//! Repository for the `projects` table.

use pitch_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{NewProject, Project, UpdateProject};
use crate::models::status::StatusId;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, slug, client_name, customer_id, status_id, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project in draft status, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (title, slug, client_name, customer_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.client_name)
            .bind(input.customer_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, most recently edited first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY updated_at DESC, id DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                client_name = COALESCE($3, client_name),
                customer_id = COALESCE($4, customer_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.client_name)
            .bind(input.customer_id)
            .fetch_optional(pool)
            .await
    }

    /// Set the lifecycle status. Returns `false` if the project does not exist.
    pub async fn set_status(pool: &PgPool, id: DbId, status_id: StatusId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET status_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump `updated_at`. Returns `false` if the project does not exist.
    pub async fn touch(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

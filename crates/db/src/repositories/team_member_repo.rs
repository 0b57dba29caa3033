//! Repository for the `team_members` table.

use pitch_core::types::DbId;
use sqlx::PgPool;

use crate::models::team_member::{CreateTeamMember, TeamMember, UpdateTeamMember};

const COLUMNS: &str = "id, name, role, bio, photo_path, email, phone, tags, created_at, updated_at";

/// Provides CRUD operations for team members.
pub struct TeamMemberRepo;

impl TeamMemberRepo {
    pub async fn create(pool: &PgPool, input: &CreateTeamMember) -> Result<TeamMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO team_members (name, role, bio, photo_path, email, phone, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.bio)
            .bind(&input.photo_path)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.tags)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM team_members WHERE id = $1");
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<TeamMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM team_members ORDER BY name");
        sqlx::query_as::<_, TeamMember>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTeamMember,
    ) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!(
            "UPDATE team_members SET
                name = COALESCE($2, name),
                role = COALESCE($3, role),
                bio = COALESCE($4, bio),
                photo_path = COALESCE($5, photo_path),
                email = COALESCE($6, email),
                phone = COALESCE($7, phone),
                tags = COALESCE($8, tags),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.bio)
            .bind(&input.photo_path)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.tags)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `collage_presets` table.

use pitch_core::types::DbId;
use sqlx::PgPool;

use crate::models::collage_preset::{CollagePreset, CreateCollagePreset, UpdateCollagePreset};

const COLUMNS: &str = "id, name, keywords, pos1, pos2, pos3, pos4, pos5, created_at, updated_at";

/// Provides CRUD operations for collage presets.
pub struct CollagePresetRepo;

impl CollagePresetRepo {
    pub async fn create(pool: &PgPool, input: &CreateCollagePreset) -> Result<CollagePreset, sqlx::Error> {
        let query = format!(
            "INSERT INTO collage_presets (name, keywords, pos1, pos2, pos3, pos4, pos5)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CollagePreset>(&query)
            .bind(&input.name)
            .bind(&input.keywords)
            .bind(input.pos1)
            .bind(input.pos2)
            .bind(input.pos3)
            .bind(input.pos4)
            .bind(input.pos5)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CollagePreset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collage_presets WHERE id = $1");
        sqlx::query_as::<_, CollagePreset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<CollagePreset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collage_presets ORDER BY name");
        sqlx::query_as::<_, CollagePreset>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCollagePreset,
    ) -> Result<Option<CollagePreset>, sqlx::Error> {
        let query = format!(
            "UPDATE collage_presets SET
                name = COALESCE($2, name),
                keywords = COALESCE($3, keywords),
                pos1 = COALESCE($4, pos1),
                pos2 = COALESCE($5, pos2),
                pos3 = COALESCE($6, pos3),
                pos4 = COALESCE($7, pos4),
                pos5 = COALESCE($8, pos5),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CollagePreset>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.keywords)
            .bind(input.pos1)
            .bind(input.pos2)
            .bind(input.pos3)
            .bind(input.pos4)
            .bind(input.pos5)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM collage_presets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

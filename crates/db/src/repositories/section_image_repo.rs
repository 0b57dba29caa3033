//! Repository for the `section_images` and association join tables.
//!
//! Associations are never patched: a save deletes every row for the section
//! and re-inserts the selection with explicit `order_index`.

use pitch_core::types::DbId;
use sqlx::PgPool;

use crate::models::case_study::CaseStudy;
use crate::models::section_image::SectionImage;
use crate::models::team_member::TeamMember;

/// Provides access to a section's attached images, case studies and team members.
pub struct SectionImageRepo;

impl SectionImageRepo {
    /// List a section's images in order, joined with their file paths.
    ///
    /// When `with_positions` is false the position columns are selected as
    /// `NULL`, for databases that have not run the positioning migration.
    pub async fn list_for_section(
        pool: &PgPool,
        section_id: DbId,
        with_positions: bool,
    ) -> Result<Vec<SectionImage>, sqlx::Error> {
        let positions = if with_positions {
            "si.position_x, si.position_y, si.zoom"
        } else {
            "NULL::float8 AS position_x, NULL::float8 AS position_y, NULL::float8 AS zoom"
        };
        let query = format!(
            "SELECT si.id, si.section_id, si.image_id, si.order_index, {positions}, i.file_path
             FROM section_images si
             JOIN images i ON i.id = si.image_id
             WHERE si.section_id = $1
             ORDER BY si.order_index, si.id"
        );
        sqlx::query_as::<_, SectionImage>(&query)
            .bind(section_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a section's image selection.
    pub async fn replace_images(pool: &PgPool, section_id: DbId, image_ids: &[DbId]) -> Result<(), sqlx::Error> {
        replace_join(pool, "section_images", "image_id", section_id, image_ids).await
    }

    /// Persist the background position for one section/image pair.
    ///
    /// Returns `false` if the image is not attached to the section.
    pub async fn save_position(
        pool: &PgPool,
        section_id: DbId,
        image_id: DbId,
        x: f64,
        y: f64,
        zoom: Option<f64>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE section_images SET position_x = $3, position_y = $4, zoom = $5
             WHERE section_id = $1 AND image_id = $2",
        )
        .bind(section_id)
        .bind(image_id)
        .bind(x)
        .bind(y)
        .bind(zoom)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Case studies linked to a section, in display order.
    pub async fn list_case_studies(pool: &PgPool, section_id: DbId) -> Result<Vec<CaseStudy>, sqlx::Error> {
        sqlx::query_as::<_, CaseStudy>(
            "SELECT c.id, c.title, c.description, c.thumbnail_path, c.tags, c.cta_label, c.cta_url,
                    c.created_at, c.updated_at
             FROM section_case_studies sc
             JOIN case_studies c ON c.id = sc.case_study_id
             WHERE sc.section_id = $1
             ORDER BY sc.order_index",
        )
        .bind(section_id)
        .fetch_all(pool)
        .await
    }

    pub async fn replace_case_studies(pool: &PgPool, section_id: DbId, ids: &[DbId]) -> Result<(), sqlx::Error> {
        replace_join(pool, "section_case_studies", "case_study_id", section_id, ids).await
    }

    /// Team members linked to a section, in display order.
    pub async fn list_team_members(pool: &PgPool, section_id: DbId) -> Result<Vec<TeamMember>, sqlx::Error> {
        sqlx::query_as::<_, TeamMember>(
            "SELECT t.id, t.name, t.role, t.bio, t.photo_path, t.email, t.phone, t.tags,
                    t.created_at, t.updated_at
             FROM section_team_members st
             JOIN team_members t ON t.id = st.team_member_id
             WHERE st.section_id = $1
             ORDER BY st.order_index",
        )
        .bind(section_id)
        .fetch_all(pool)
        .await
    }

    pub async fn replace_team_members(pool: &PgPool, section_id: DbId, ids: &[DbId]) -> Result<(), sqlx::Error> {
        replace_join(pool, "section_team_members", "team_member_id", section_id, ids).await
    }
}

/// Delete-all then insert-new, as two independent statements.
async fn replace_join(
    pool: &PgPool,
    table: &str,
    column: &str,
    section_id: DbId,
    ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("DELETE FROM {table} WHERE section_id = $1"))
        .bind(section_id)
        .execute(pool)
        .await?;
    if ids.is_empty() {
        return Ok(());
    }
    let orders: Vec<i32> = (0..ids.len() as i32).collect();
    sqlx::query(&format!(
        "INSERT INTO {table} (section_id, {column}, order_index)
         SELECT $1, x.id, x.ord FROM UNNEST($2::bigint[], $3::int[]) AS x(id, ord)"
    ))
    .bind(section_id)
    .bind(ids)
    .bind(&orders)
    .execute(pool)
    .await?;
    Ok(())
}

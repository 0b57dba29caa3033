//! Repository for the `analytics_sessions` table.

use pitch_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::analytics::{AnalyticsSession, SessionWrite};

const COLUMNS: &str =
    "id, scope, scope_id, session_id, started_at, ended_at, duration_ms, sections, updated_at";

/// Viewer analytics sessions.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    pub async fn find(
        pool: &PgPool,
        scope: &str,
        scope_id: DbId,
        session_id: &str,
    ) -> Result<Option<AnalyticsSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM analytics_sessions
             WHERE scope = $1 AND scope_id = $2 AND session_id = $3"
        );
        sqlx::query_as::<_, AnalyticsSession>(&query)
            .bind(scope)
            .bind(scope_id)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite the session keyed by `(scope, scope_id, session_id)`.
    pub async fn upsert(pool: &PgPool, input: &SessionWrite) -> Result<AnalyticsSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO analytics_sessions
                (scope, scope_id, session_id, started_at, ended_at, duration_ms, sections)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT ON CONSTRAINT uq_analytics_sessions_key DO UPDATE SET
                ended_at = EXCLUDED.ended_at,
                duration_ms = EXCLUDED.duration_ms,
                sections = EXCLUDED.sections,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AnalyticsSession>(&query)
            .bind(&input.scope)
            .bind(input.scope_id)
            .bind(&input.session_id)
            .bind(input.state.started_at)
            .bind(input.state.ended_at)
            .bind(input.duration_ms())
            .bind(Json(&input.state.sections))
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool, scope: &str, scope_id: DbId) -> Result<Vec<AnalyticsSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM analytics_sessions
             WHERE scope = $1 AND scope_id = $2
             ORDER BY started_at"
        );
        sqlx::query_as::<_, AnalyticsSession>(&query)
            .bind(scope)
            .bind(scope_id)
            .fetch_all(pool)
            .await
    }
}

//! Viewer analytics session rows.

use pitch_core::analytics::{SectionStatsMap, SessionState};
use pitch_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// An `analytics_sessions` row.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AnalyticsSession {
    pub id: DbId,
    /// `project` or `quote`.
    pub scope: String,
    pub scope_id: DbId,
    pub session_id: String,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub duration_ms: Option<i64>,
    pub sections: Json<SectionStatsMap>,
    pub updated_at: Timestamp,
}

impl AnalyticsSession {
    pub fn state(&self) -> SessionState {
        SessionState {
            started_at: self.started_at,
            ended_at: self.ended_at,
            duration_ms: self.duration_ms.map(|d| d.max(0) as u64),
            sections: self.sections.0.clone(),
        }
    }
}

/// Upsert payload for one session.
#[derive(Debug, Clone)]
pub struct SessionWrite {
    pub scope: String,
    pub scope_id: DbId,
    pub session_id: String,
    pub state: SessionState,
}

impl SessionWrite {
    pub fn duration_ms(&self) -> Option<i64> {
        self.state.duration_ms.map(|d| i64::try_from(d).unwrap_or(i64::MAX))
    }
}

//! Share token rows.

use pitch_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A `project_shares` row. Its existence is the only gate for public access.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ProjectShare {
    pub id: DbId,
    pub project_id: DbId,
    pub token: String,
    pub created_at: Timestamp,
}

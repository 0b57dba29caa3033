//! Section entity model and DTOs.

use pitch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A section row from the `sections` table.
///
/// `section_type` is kept as the raw stored string; callers parse it into
/// [`pitch_core::section_type::SectionType`] and skip rows that fail.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Section {
    pub id: DbId,
    pub project_id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub section_type: String,
    pub content: serde_json::Value,
    pub visible: bool,
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a section.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSection {
    pub project_id: DbId,
    #[serde(rename = "type")]
    pub section_type: String,
    pub content: serde_json::Value,
    pub visible: bool,
    pub order_index: i32,
}

/// The mutable part of a section written back by a save.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionWrite {
    pub content: serde_json::Value,
    pub visible: bool,
    pub order_index: i32,
}

impl From<&Section> for SectionWrite {
    fn from(section: &Section) -> Self {
        Self {
            content: section.content.clone(),
            visible: section.visible,
            order_index: section.order_index,
        }
    }
}

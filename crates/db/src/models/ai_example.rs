//! Curated AI example texts.

use pitch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An `ai_examples` row.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AiExample {
    pub id: DbId,
    pub section_type: String,
    pub project_type: String,
    pub text: String,
    /// Editorial ranking, 1..=10.
    pub quality_score: i16,
    pub usage_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an example.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAiExample {
    #[validate(length(min = 1))]
    pub section_type: String,
    #[validate(length(min = 1))]
    pub project_type: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(range(min = 1, max = 10))]
    pub quality_score: i16,
}

/// DTO for updating an example. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAiExample {
    #[validate(length(min = 1))]
    pub section_type: Option<String>,
    #[validate(length(min = 1))]
    pub project_type: Option<String>,
    #[validate(length(min = 1))]
    pub text: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub quality_score: Option<i16>,
}

/// Optional list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiExampleFilter {
    pub section_type: Option<String>,
    pub project_type: Option<String>,
}

//! Case study entity model and DTOs.

use pitch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A case study row from the `case_studies` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct CaseStudy {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Object-storage path of the thumbnail.
    pub thumbnail_path: Option<String>,
    pub tags: Vec<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a case study.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCaseStudy {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub cta_label: Option<String>,
    #[validate(url)]
    pub cta_url: Option<String>,
}

/// DTO for updating a case study. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCaseStudy {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_path: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cta_label: Option<String>,
    #[validate(url)]
    pub cta_url: Option<String>,
}

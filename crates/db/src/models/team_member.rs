//! Team member entity model and DTOs.

use pitch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A team member row from the `team_members` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TeamMember {
    pub id: DbId,
    pub name: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub photo_path: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a team member.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeamMember {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub photo_path: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// DTO for updating a team member. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTeamMember {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub photo_path: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tags: Option<Vec<String>>,
}

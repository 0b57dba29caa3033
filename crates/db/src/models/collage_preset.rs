//! Collage preset model and DTOs.

use pitch_core::content::COLLAGE_SLOTS;
use pitch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A collage preset row: a named bundle of exactly five images.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct CollagePreset {
    pub id: DbId,
    pub name: String,
    pub keywords: Vec<String>,
    pub pos1: DbId,
    pub pos2: DbId,
    pub pos3: DbId,
    pub pos4: DbId,
    pub pos5: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CollagePreset {
    /// Image ids in slot order `pos1..pos5`.
    pub fn slots(&self) -> [DbId; COLLAGE_SLOTS] {
        [self.pos1, self.pos2, self.pos3, self.pos4, self.pos5]
    }
}

/// DTO for creating a collage preset. All five slots are required.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCollagePreset {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub pos1: DbId,
    pub pos2: DbId,
    pub pos3: DbId,
    pub pos4: DbId,
    pub pos5: DbId,
}

/// DTO for updating a collage preset. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCollagePreset {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub pos1: Option<DbId>,
    pub pos2: Option<DbId>,
    pub pos3: Option<DbId>,
    pub pos4: Option<DbId>,
    pub pos5: Option<DbId>,
}

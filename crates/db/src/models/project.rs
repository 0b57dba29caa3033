//! Project entity model and DTOs.

use pitch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::StatusId;

/// A project row from the `projects` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    /// Denormalized from the customer when not given explicitly.
    pub client_name: Option<String>,
    pub customer_id: Option<DbId>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub customer_id: Option<DbId>,
    pub client_name: Option<String>,
}

/// Insert DTO with the derived fields filled in.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub slug: String,
    pub client_name: Option<String>,
    pub customer_id: Option<DbId>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub client_name: Option<String>,
    pub customer_id: Option<DbId>,
}

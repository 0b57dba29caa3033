//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod ai_example;
pub mod analytics;
pub mod case_study;
pub mod collage_preset;
pub mod customer;
pub mod image;
pub mod project;
pub mod project_share;
pub mod quote;
pub mod section;
pub mod section_image;
pub mod status;
pub mod team_member;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod ai_example_repo;
pub mod analytics_repo;
pub mod case_study_repo;
pub mod collage_preset_repo;
pub mod customer_repo;
pub mod image_repo;
pub mod project_repo;
pub mod project_share_repo;
pub mod quote_repo;
pub mod schema_repo;
pub mod section_image_repo;
pub mod section_repo;
pub mod team_member_repo;

pub use ai_example_repo::AiExampleRepo;
pub use analytics_repo::AnalyticsRepo;
pub use case_study_repo::CaseStudyRepo;
pub use collage_preset_repo::CollagePresetRepo;
pub use customer_repo::CustomerRepo;
pub use image_repo::ImageRepo;
pub use project_repo::ProjectRepo;
pub use project_share_repo::ProjectShareRepo;
pub use quote_repo::QuoteRepo;
pub use schema_repo::SchemaRepo;
pub use section_image_repo::SectionImageRepo;
pub use section_repo::SectionRepo;
pub use team_member_repo::TeamMemberRepo;

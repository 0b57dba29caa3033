//! Injected storage client.
//!
//! Every component that touches persistence receives an `Arc<dyn PitchStore>`
//! constructed once at startup. [`pg::PgStore`] delegates to the repositories;
//! [`memory::MemoryStore`] keeps everything in process for tests and for
//! running without `DATABASE_URL`.
//!
//! Each call is independently atomic; there is no cross-call transaction.

use async_trait::async_trait;
use pitch_core::types::DbId;

use crate::models::ai_example::{AiExample, AiExampleFilter, CreateAiExample, UpdateAiExample};
use crate::models::analytics::{AnalyticsSession, SessionWrite};
use crate::models::case_study::{CaseStudy, CreateCaseStudy, UpdateCaseStudy};
use crate::models::collage_preset::{CollagePreset, CreateCollagePreset, UpdateCollagePreset};
use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use crate::models::image::{CreateImage, Image, ImageFilter, UpdateImage};
use crate::models::project::{NewProject, Project, UpdateProject};
use crate::models::project_share::ProjectShare;
use crate::models::quote::{AcceptQuote, Contract, Quote};
use crate::models::section::{CreateSection, Section, SectionWrite};
use crate::models::section_image::SectionImage;
use crate::models::status::StatusId;
use crate::models::team_member::{CreateTeamMember, TeamMember, UpdateTeamMember};

pub mod memory;
pub mod pg;

/// Errors raised by a storage client.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A uniqueness rule was violated (in-memory counterpart of a `uq_` constraint).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend could not be reached or refused the call.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The database lacks columns this call needs.
    #[error("Schema drift: {0}")]
    SchemaDrift(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, input: &NewProject) -> StoreResult<Project>;
    async fn get_project(&self, id: DbId) -> StoreResult<Option<Project>>;
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;
    async fn update_project(&self, id: DbId, input: &UpdateProject) -> StoreResult<Option<Project>>;
    /// Returns `false` if the project does not exist.
    async fn set_project_status(&self, id: DbId, status_id: StatusId) -> StoreResult<bool>;
    /// Bump `updated_at`. Returns `false` if the project does not exist.
    async fn touch_project(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait SectionStore: Send + Sync {
    async fn create_section(&self, input: &CreateSection) -> StoreResult<Section>;
    async fn get_section(&self, id: DbId) -> StoreResult<Option<Section>>;
    /// A project's sections ordered by `order_index`.
    async fn list_sections(&self, project_id: DbId) -> StoreResult<Vec<Section>>;
    /// Returns `false` if the section does not exist.
    async fn save_section(&self, id: DbId, input: &SectionWrite) -> StoreResult<bool>;
    async fn delete_section(&self, id: DbId) -> StoreResult<bool>;

    async fn list_section_images(&self, section_id: DbId) -> StoreResult<Vec<SectionImage>>;
    /// Delete-all then insert `image_ids` with `order_index` 0..n.
    async fn replace_section_images(&self, section_id: DbId, image_ids: &[DbId]) -> StoreResult<()>;
    /// Returns `false` if the image is not attached to the section.
    async fn save_image_position(
        &self,
        section_id: DbId,
        image_id: DbId,
        x: f64,
        y: f64,
        zoom: Option<f64>,
    ) -> StoreResult<bool>;
    /// Whether background positions can be stored. Fixed at construction.
    fn supports_image_positions(&self) -> bool;

    async fn list_section_case_studies(&self, section_id: DbId) -> StoreResult<Vec<CaseStudy>>;
    async fn replace_section_case_studies(&self, section_id: DbId, ids: &[DbId]) -> StoreResult<()>;
    async fn list_section_team_members(&self, section_id: DbId) -> StoreResult<Vec<TeamMember>>;
    async fn replace_section_team_members(&self, section_id: DbId, ids: &[DbId]) -> StoreResult<()>;
}

#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn create_customer(&self, input: &CreateCustomer) -> StoreResult<Customer>;
    async fn get_customer(&self, id: DbId) -> StoreResult<Option<Customer>>;
    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;
    async fn update_customer(&self, id: DbId, input: &UpdateCustomer) -> StoreResult<Option<Customer>>;
    async fn delete_customer(&self, id: DbId) -> StoreResult<bool>;

    async fn create_case_study(&self, input: &CreateCaseStudy) -> StoreResult<CaseStudy>;
    async fn get_case_study(&self, id: DbId) -> StoreResult<Option<CaseStudy>>;
    async fn list_case_studies(&self) -> StoreResult<Vec<CaseStudy>>;
    async fn update_case_study(&self, id: DbId, input: &UpdateCaseStudy) -> StoreResult<Option<CaseStudy>>;
    async fn delete_case_study(&self, id: DbId) -> StoreResult<bool>;

    async fn create_team_member(&self, input: &CreateTeamMember) -> StoreResult<TeamMember>;
    async fn get_team_member(&self, id: DbId) -> StoreResult<Option<TeamMember>>;
    async fn list_team_members(&self) -> StoreResult<Vec<TeamMember>>;
    async fn update_team_member(&self, id: DbId, input: &UpdateTeamMember) -> StoreResult<Option<TeamMember>>;
    async fn delete_team_member(&self, id: DbId) -> StoreResult<bool>;

    async fn create_image(&self, input: &CreateImage) -> StoreResult<Image>;
    async fn get_image(&self, id: DbId) -> StoreResult<Option<Image>>;
    async fn get_images(&self, ids: &[DbId]) -> StoreResult<Vec<Image>>;
    async fn list_images(&self, filter: &ImageFilter) -> StoreResult<Vec<Image>>;
    async fn update_image(&self, id: DbId, input: &UpdateImage) -> StoreResult<Option<Image>>;
    async fn delete_image(&self, id: DbId) -> StoreResult<bool>;

    async fn create_collage_preset(&self, input: &CreateCollagePreset) -> StoreResult<CollagePreset>;
    async fn get_collage_preset(&self, id: DbId) -> StoreResult<Option<CollagePreset>>;
    async fn list_collage_presets(&self) -> StoreResult<Vec<CollagePreset>>;
    async fn update_collage_preset(
        &self,
        id: DbId,
        input: &UpdateCollagePreset,
    ) -> StoreResult<Option<CollagePreset>>;
    async fn delete_collage_preset(&self, id: DbId) -> StoreResult<bool>;

    async fn create_ai_example(&self, input: &CreateAiExample) -> StoreResult<AiExample>;
    async fn get_ai_example(&self, id: DbId) -> StoreResult<Option<AiExample>>;
    async fn list_ai_examples(&self, filter: &AiExampleFilter) -> StoreResult<Vec<AiExample>>;
    /// Best examples for the pair, highest `quality_score` first, at most five.
    async fn top_ai_examples(&self, section_type: &str, project_type: &str) -> StoreResult<Vec<AiExample>>;
    async fn update_ai_example(&self, id: DbId, input: &UpdateAiExample) -> StoreResult<Option<AiExample>>;
    async fn increment_ai_example_usage(&self, ids: &[DbId]) -> StoreResult<()>;
    async fn delete_ai_example(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait ShareStore: Send + Sync {
    async fn create_share(&self, project_id: DbId, token: &str) -> StoreResult<ProjectShare>;
    async fn find_share_by_project(&self, project_id: DbId) -> StoreResult<Option<ProjectShare>>;
    async fn find_share_by_token(&self, token: &str) -> StoreResult<Option<ProjectShare>>;
    /// Returns `false` if no share existed.
    async fn delete_share_by_project(&self, project_id: DbId) -> StoreResult<bool>;

    async fn create_quote(&self, project_id: DbId, input: &AcceptQuote) -> StoreResult<Quote>;
    async fn get_quote(&self, id: DbId) -> StoreResult<Option<Quote>>;
    async fn find_quote_by_project(&self, project_id: DbId) -> StoreResult<Option<Quote>>;
    async fn create_contract(&self, quote_id: DbId) -> StoreResult<Contract>;
}

#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn find_analytics_session(
        &self,
        scope: &str,
        scope_id: DbId,
        session_id: &str,
    ) -> StoreResult<Option<AnalyticsSession>>;
    async fn upsert_analytics_session(&self, input: &SessionWrite) -> StoreResult<AnalyticsSession>;
    async fn list_analytics_sessions(&self, scope: &str, scope_id: DbId) -> StoreResult<Vec<AnalyticsSession>>;
}

/// The complete storage client.
pub trait PitchStore: ProjectStore + SectionStore + LibraryStore + ShareStore + AnalyticsStore {}

impl<T> PitchStore for T where T: ProjectStore + SectionStore + LibraryStore + ShareStore + AnalyticsStore {}

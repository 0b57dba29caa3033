//! Postgres-backed storage client.

use async_trait::async_trait;
use pitch_core::types::DbId;
use sqlx::PgPool;

use super::{
    AnalyticsStore, LibraryStore, ProjectStore, SectionStore, ShareStore, StoreError, StoreResult,
};
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
use crate::repositories::{
    AiExampleRepo, AnalyticsRepo, CaseStudyRepo, CollagePresetRepo, CustomerRepo, ImageRepo,
    ProjectRepo, ProjectShareRepo, QuoteRepo, SchemaRepo, SectionImageRepo, SectionRepo,
    TeamMemberRepo,
};

/// Optional schema features, detected once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// `section_images` has `position_x`, `position_y` and `zoom`.
    pub section_image_positions: bool,
}

impl Capabilities {
    pub async fn detect(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let mut positions = true;
        for column in ["position_x", "position_y", "zoom"] {
            positions &= SchemaRepo::has_column(pool, "section_images", column).await?;
        }
        Ok(Self {
            section_image_positions: positions,
        })
    }
}

/// Storage client over a Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    capabilities: Capabilities,
}

impl PgStore {
    /// Wrap `pool`, probing the schema for optional columns.
    pub async fn connect(pool: PgPool) -> Result<Self, sqlx::Error> {
        let capabilities = Capabilities::detect(&pool).await?;
        if !capabilities.section_image_positions {
            tracing::warn!("section_images has no position columns; background positions will not be saved");
        }
        tracing::info!(?capabilities, "Storage capabilities detected");
        Ok(Self { pool, capabilities })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn create_project(&self, input: &NewProject) -> StoreResult<Project> {
        Ok(ProjectRepo::create(&self.pool, input).await?)
    }

    async fn get_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        Ok(ProjectRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(ProjectRepo::list(&self.pool).await?)
    }

    async fn update_project(&self, id: DbId, input: &UpdateProject) -> StoreResult<Option<Project>> {
        Ok(ProjectRepo::update(&self.pool, id, input).await?)
    }

    async fn set_project_status(&self, id: DbId, status_id: StatusId) -> StoreResult<bool> {
        Ok(ProjectRepo::set_status(&self.pool, id, status_id).await?)
    }

    async fn touch_project(&self, id: DbId) -> StoreResult<bool> {
        Ok(ProjectRepo::touch(&self.pool, id).await?)
    }
}

#[async_trait]
impl SectionStore for PgStore {
    async fn create_section(&self, input: &CreateSection) -> StoreResult<Section> {
        Ok(SectionRepo::create(&self.pool, input).await?)
    }

    async fn get_section(&self, id: DbId) -> StoreResult<Option<Section>> {
        Ok(SectionRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_sections(&self, project_id: DbId) -> StoreResult<Vec<Section>> {
        Ok(SectionRepo::list_by_project(&self.pool, project_id).await?)
    }

    async fn save_section(&self, id: DbId, input: &SectionWrite) -> StoreResult<bool> {
        Ok(SectionRepo::save(&self.pool, id, input).await?)
    }

    async fn delete_section(&self, id: DbId) -> StoreResult<bool> {
        Ok(SectionRepo::delete(&self.pool, id).await?)
    }

    async fn list_section_images(&self, section_id: DbId) -> StoreResult<Vec<SectionImage>> {
        Ok(SectionImageRepo::list_for_section(
            &self.pool,
            section_id,
            self.capabilities.section_image_positions,
        )
        .await?)
    }

    async fn replace_section_images(&self, section_id: DbId, image_ids: &[DbId]) -> StoreResult<()> {
        Ok(SectionImageRepo::replace_images(&self.pool, section_id, image_ids).await?)
    }

    async fn save_image_position(
        &self,
        section_id: DbId,
        image_id: DbId,
        x: f64,
        y: f64,
        zoom: Option<f64>,
    ) -> StoreResult<bool> {
        if !self.capabilities.section_image_positions {
            return Err(StoreError::SchemaDrift(
                "section_images position columns do not exist".to_string(),
            ));
        }
        Ok(SectionImageRepo::save_position(&self.pool, section_id, image_id, x, y, zoom).await?)
    }

    fn supports_image_positions(&self) -> bool {
        self.capabilities.section_image_positions
    }

    async fn list_section_case_studies(&self, section_id: DbId) -> StoreResult<Vec<CaseStudy>> {
        Ok(SectionImageRepo::list_case_studies(&self.pool, section_id).await?)
    }

    async fn replace_section_case_studies(&self, section_id: DbId, ids: &[DbId]) -> StoreResult<()> {
        Ok(SectionImageRepo::replace_case_studies(&self.pool, section_id, ids).await?)
    }

    async fn list_section_team_members(&self, section_id: DbId) -> StoreResult<Vec<TeamMember>> {
        Ok(SectionImageRepo::list_team_members(&self.pool, section_id).await?)
    }

    async fn replace_section_team_members(&self, section_id: DbId, ids: &[DbId]) -> StoreResult<()> {
        Ok(SectionImageRepo::replace_team_members(&self.pool, section_id, ids).await?)
    }
}

#[async_trait]
impl LibraryStore for PgStore {
    async fn create_customer(&self, input: &CreateCustomer) -> StoreResult<Customer> {
        Ok(CustomerRepo::create(&self.pool, input).await?)
    }

    async fn get_customer(&self, id: DbId) -> StoreResult<Option<Customer>> {
        Ok(CustomerRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        Ok(CustomerRepo::list(&self.pool).await?)
    }

    async fn update_customer(&self, id: DbId, input: &UpdateCustomer) -> StoreResult<Option<Customer>> {
        Ok(CustomerRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_customer(&self, id: DbId) -> StoreResult<bool> {
        Ok(CustomerRepo::delete(&self.pool, id).await?)
    }

    async fn create_case_study(&self, input: &CreateCaseStudy) -> StoreResult<CaseStudy> {
        Ok(CaseStudyRepo::create(&self.pool, input).await?)
    }

    async fn get_case_study(&self, id: DbId) -> StoreResult<Option<CaseStudy>> {
        Ok(CaseStudyRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_case_studies(&self) -> StoreResult<Vec<CaseStudy>> {
        Ok(CaseStudyRepo::list(&self.pool).await?)
    }

    async fn update_case_study(&self, id: DbId, input: &UpdateCaseStudy) -> StoreResult<Option<CaseStudy>> {
        Ok(CaseStudyRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_case_study(&self, id: DbId) -> StoreResult<bool> {
        Ok(CaseStudyRepo::delete(&self.pool, id).await?)
    }

    async fn create_team_member(&self, input: &CreateTeamMember) -> StoreResult<TeamMember> {
        Ok(TeamMemberRepo::create(&self.pool, input).await?)
    }

    async fn get_team_member(&self, id: DbId) -> StoreResult<Option<TeamMember>> {
        Ok(TeamMemberRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_team_members(&self) -> StoreResult<Vec<TeamMember>> {
        Ok(TeamMemberRepo::list(&self.pool).await?)
    }

    async fn update_team_member(&self, id: DbId, input: &UpdateTeamMember) -> StoreResult<Option<TeamMember>> {
        Ok(TeamMemberRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_team_member(&self, id: DbId) -> StoreResult<bool> {
        Ok(TeamMemberRepo::delete(&self.pool, id).await?)
    }

    async fn create_image(&self, input: &CreateImage) -> StoreResult<Image> {
        Ok(ImageRepo::create(&self.pool, input).await?)
    }

    async fn get_image(&self, id: DbId) -> StoreResult<Option<Image>> {
        Ok(ImageRepo::find_by_id(&self.pool, id).await?)
    }

    async fn get_images(&self, ids: &[DbId]) -> StoreResult<Vec<Image>> {
        Ok(ImageRepo::find_many(&self.pool, ids).await?)
    }

    async fn list_images(&self, filter: &ImageFilter) -> StoreResult<Vec<Image>> {
        Ok(ImageRepo::list(&self.pool, filter).await?)
    }

    async fn update_image(&self, id: DbId, input: &UpdateImage) -> StoreResult<Option<Image>> {
        Ok(ImageRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_image(&self, id: DbId) -> StoreResult<bool> {
        Ok(ImageRepo::delete(&self.pool, id).await?)
    }

    async fn create_collage_preset(&self, input: &CreateCollagePreset) -> StoreResult<CollagePreset> {
        Ok(CollagePresetRepo::create(&self.pool, input).await?)
    }

    async fn get_collage_preset(&self, id: DbId) -> StoreResult<Option<CollagePreset>> {
        Ok(CollagePresetRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_collage_presets(&self) -> StoreResult<Vec<CollagePreset>> {
        Ok(CollagePresetRepo::list(&self.pool).await?)
    }

    async fn update_collage_preset(
        &self,
        id: DbId,
        input: &UpdateCollagePreset,
    ) -> StoreResult<Option<CollagePreset>> {
        Ok(CollagePresetRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_collage_preset(&self, id: DbId) -> StoreResult<bool> {
        Ok(CollagePresetRepo::delete(&self.pool, id).await?)
    }

    async fn create_ai_example(&self, input: &CreateAiExample) -> StoreResult<AiExample> {
        Ok(AiExampleRepo::create(&self.pool, input).await?)
    }

    async fn get_ai_example(&self, id: DbId) -> StoreResult<Option<AiExample>> {
        Ok(AiExampleRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_ai_examples(&self, filter: &AiExampleFilter) -> StoreResult<Vec<AiExample>> {
        Ok(AiExampleRepo::list(&self.pool, filter).await?)
    }

    async fn top_ai_examples(&self, section_type: &str, project_type: &str) -> StoreResult<Vec<AiExample>> {
        Ok(AiExampleRepo::top_for(&self.pool, section_type, project_type).await?)
    }

    async fn update_ai_example(&self, id: DbId, input: &UpdateAiExample) -> StoreResult<Option<AiExample>> {
        Ok(AiExampleRepo::update(&self.pool, id, input).await?)
    }

    async fn increment_ai_example_usage(&self, ids: &[DbId]) -> StoreResult<()> {
        AiExampleRepo::increment_usage(&self.pool, ids).await?;
        Ok(())
    }

    async fn delete_ai_example(&self, id: DbId) -> StoreResult<bool> {
        Ok(AiExampleRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl ShareStore for PgStore {
    async fn create_share(&self, project_id: DbId, token: &str) -> StoreResult<ProjectShare> {
        Ok(ProjectShareRepo::create(&self.pool, project_id, token).await?)
    }

    async fn find_share_by_project(&self, project_id: DbId) -> StoreResult<Option<ProjectShare>> {
        Ok(ProjectShareRepo::find_by_project(&self.pool, project_id).await?)
    }

    async fn find_share_by_token(&self, token: &str) -> StoreResult<Option<ProjectShare>> {
        Ok(ProjectShareRepo::find_by_token(&self.pool, token).await?)
    }

    async fn delete_share_by_project(&self, project_id: DbId) -> StoreResult<bool> {
        Ok(ProjectShareRepo::delete_by_project(&self.pool, project_id).await?)
    }

    async fn create_quote(&self, project_id: DbId, input: &AcceptQuote) -> StoreResult<Quote> {
        Ok(QuoteRepo::create_quote(&self.pool, project_id, input).await?)
    }

    async fn get_quote(&self, id: DbId) -> StoreResult<Option<Quote>> {
        Ok(QuoteRepo::find_quote(&self.pool, id).await?)
    }

    async fn find_quote_by_project(&self, project_id: DbId) -> StoreResult<Option<Quote>> {
        Ok(QuoteRepo::find_quote_by_project(&self.pool, project_id).await?)
    }

    async fn create_contract(&self, quote_id: DbId) -> StoreResult<Contract> {
        Ok(QuoteRepo::create_contract(&self.pool, quote_id).await?)
    }
}

#[async_trait]
impl AnalyticsStore for PgStore {
    async fn find_analytics_session(
        &self,
        scope: &str,
        scope_id: DbId,
        session_id: &str,
    ) -> StoreResult<Option<AnalyticsSession>> {
        Ok(AnalyticsRepo::find(&self.pool, scope, scope_id, session_id).await?)
    }

    async fn upsert_analytics_session(&self, input: &SessionWrite) -> StoreResult<AnalyticsSession> {
        Ok(AnalyticsRepo::upsert(&self.pool, input).await?)
    }

    async fn list_analytics_sessions(&self, scope: &str, scope_id: DbId) -> StoreResult<Vec<AnalyticsSession>> {
        Ok(AnalyticsRepo::list(&self.pool, scope, scope_id).await?)
    }
}

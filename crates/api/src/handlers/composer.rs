//! Handlers for an open composer session under `/projects/{id}/composer`.
//!
//! Every mutation edits the in-memory session and schedules an autosave;
//! `POST .../save` persists immediately and reports failures.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pitch_composer::session::{AssociationSelection, SaveReport};
use pitch_composer::generation::{GeneratedText, SectionGenerationParams};
use pitch_composer::ComposerSession;
use pitch_core::render::SectionView;
use pitch_core::types::DbId;
use pitch_db::models::section::Section;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Edit-mode snapshot of a composer session.
#[derive(Debug, Serialize)]
pub struct ComposerView {
    pub project_id: DbId,
    pub edit_mode: bool,
    pub pending_save: bool,
    pub sections: Vec<SectionView>,
    pub case_studies: Option<AssociationSelection>,
    pub team_members: Option<AssociationSelection>,
}

async fn composer_view(state: &AppState, session: &ComposerSession) -> ComposerView {
    ComposerView {
        project_id: session.project_id(),
        edit_mode: session.is_edit_mode(),
        pending_save: session.has_pending_save(),
        sections: session.view(&state.urls).await,
        case_studies: session.case_study_selection(),
        team_members: session.team_selection(),
    }
}

#[derive(Debug, Deserialize)]
pub struct AddSectionRequest {
    #[serde(rename = "type")]
    pub section_type: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPatch {
    pub key: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetRequest {
    pub preset_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub ids: Vec<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct TimelinePhaseRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

/// Section after AI generation, plus what the model returned.
#[derive(Debug, Serialize)]
pub struct GeneratedSection {
    pub section: Section,
    pub generated: GeneratedText,
}

/// POST /api/v1/projects/{id}/composer
///
/// Enter edit mode. Opening an already open project returns its session.
pub async fn open(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ComposerView>>> {
    let session = state.composer.open(project_id).await?;
    tracing::info!(project_id, "Composer opened");
    Ok(Json(DataResponse {
        data: composer_view(&state, &session).await,
    }))
}

/// GET /api/v1/projects/{id}/composer
pub async fn view(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ComposerView>>> {
    let session = state.composer.require(project_id)?;
    Ok(Json(DataResponse {
        data: composer_view(&state, &session).await,
    }))
}

/// DELETE /api/v1/projects/{id}/composer
///
/// Leave edit mode, flushing any pending autosave.
pub async fn close(State(state): State<AppState>, Path(project_id): Path<DbId>) -> AppResult<StatusCode> {
    if state.composer.close(project_id).await {
        tracing::info!(project_id, "Composer closed");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/composer/save
pub async fn save(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SaveReport>>> {
    let session = state.composer.require(project_id)?;
    let report = session.handle_save(true).await?;
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/projects/{id}/composer/sections
pub async fn add_section(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<AddSectionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Section>>)> {
    let session = state.composer.require(project_id)?;
    let section = session.add_section(&input.section_type).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: section })))
}

/// PUT /api/v1/projects/{id}/composer/sections
pub async fn reorder(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<DataResponse<Vec<Section>>>> {
    let session = state.composer.require(project_id)?;
    let sections = session.reorder(&input.order)?;
    Ok(Json(DataResponse { data: sections }))
}

/// DELETE /api/v1/projects/{id}/composer/sections/{section_id}
pub async fn remove_section(
    State(state): State<AppState>,
    Path((project_id, section_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let session = state.composer.require(project_id)?;
    session.remove_section(section_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/projects/{id}/composer/sections/{section_id}/content
///
/// Sets one content key; every other key is preserved.
pub async fn update_content(
    State(state): State<AppState>,
    Path((project_id, section_id)): Path<(DbId, DbId)>,
    Json(input): Json<ContentPatch>,
) -> AppResult<Json<DataResponse<Section>>> {
    let session = state.composer.require(project_id)?;
    let section = session.update_content(section_id, &input.key, input.value)?;
    Ok(Json(DataResponse { data: section }))
}

/// PUT /api/v1/projects/{id}/composer/sections/{section_id}/visibility
pub async fn set_visibility(
    State(state): State<AppState>,
    Path((project_id, section_id)): Path<(DbId, DbId)>,
    Json(input): Json<VisibilityRequest>,
) -> AppResult<Json<DataResponse<Section>>> {
    let session = state.composer.require(project_id)?;
    let section = session.set_visibility(section_id, input.visible)?;
    Ok(Json(DataResponse { data: section }))
}

/// POST /api/v1/projects/{id}/composer/sections/{section_id}/preset
pub async fn apply_preset(
    State(state): State<AppState>,
    Path((project_id, section_id)): Path<(DbId, DbId)>,
    Json(input): Json<PresetRequest>,
) -> AppResult<Json<DataResponse<Section>>> {
    let session = state.composer.require(project_id)?;
    let section = session.apply_collage_preset(section_id, input.preset_id).await?;
    Ok(Json(DataResponse { data: section }))
}

/// POST /api/v1/projects/{id}/composer/sections/{section_id}/generate
pub async fn generate(
    State(state): State<AppState>,
    Path((project_id, section_id)): Path<(DbId, DbId)>,
    Json(params): Json<SectionGenerationParams>,
) -> AppResult<Json<DataResponse<GeneratedSection>>> {
    let session = state.composer.require(project_id)?;
    let (section, generated) = state
        .generator
        .generate_into_section(&session, section_id, &params)
        .await?;
    Ok(Json(DataResponse {
        data: GeneratedSection { section, generated },
    }))
}

/// PUT /api/v1/projects/{id}/composer/sections/{section_id}/timeline/{index}
pub async fn edit_timeline_phase(
    State(state): State<AppState>,
    Path((project_id, section_id, index)): Path<(DbId, DbId, usize)>,
    Json(input): Json<TimelinePhaseRequest>,
) -> AppResult<Json<DataResponse<Section>>> {
    let session = state.composer.require(project_id)?;
    let section = session.edit_timeline_phase(section_id, index, &input.title, &input.text)?;
    Ok(Json(DataResponse { data: section }))
}

/// POST /api/v1/projects/{id}/composer/sections/{section_id}/deliverables
pub async fn add_deliverable(
    State(state): State<AppState>,
    Path((project_id, section_id)): Path<(DbId, DbId)>,
) -> AppResult<(StatusCode, Json<DataResponse<Section>>)> {
    let session = state.composer.require(project_id)?;
    let section = session.add_deliverable(section_id)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: section })))
}

/// DELETE /api/v1/projects/{id}/composer/sections/{section_id}/deliverables/{index}
pub async fn remove_deliverable(
    State(state): State<AppState>,
    Path((project_id, section_id, index)): Path<(DbId, DbId, usize)>,
) -> AppResult<Json<DataResponse<Section>>> {
    let session = state.composer.require(project_id)?;
    let section = session.remove_deliverable(section_id, index)?;
    Ok(Json(DataResponse { data: section }))
}

/// PUT /api/v1/projects/{id}/composer/case-studies
pub async fn set_case_studies(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<SelectionRequest>,
) -> AppResult<Json<DataResponse<AssociationSelection>>> {
    let session = state.composer.require(project_id)?;
    let selection = session.set_case_studies(&input.ids).await?;
    Ok(Json(DataResponse { data: selection }))
}

/// PUT /api/v1/projects/{id}/composer/team-members
pub async fn set_team_members(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<SelectionRequest>,
) -> AppResult<Json<DataResponse<AssociationSelection>>> {
    let session = state.composer.require(project_id)?;
    let selection = session.set_team_members(&input.ids).await?;
    Ok(Json(DataResponse { data: selection }))
}

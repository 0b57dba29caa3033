//! Handlers for the `/projects` resource.
//!
//! Creating a project scaffolds its default sections. Archiving closes any
//! open composer session first so a pending autosave is not lost.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pitch_composer::projects::create_project;
use pitch_core::error::CoreError;
use pitch_core::publish::{share_url, status_name, STATUS_ARCHIVED};
use pitch_core::types::DbId;
use pitch_db::models::project::{CreateProject, Project, UpdateProject};
use pitch_db::models::section::Section;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::IncludeArchivedParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A project with its sections, status label and share link.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub status: &'static str,
    pub share_url: Option<String>,
    pub sections: Vec<Section>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

async fn detail(state: &AppState, project: Project) -> AppResult<ProjectDetail> {
    let sections = state.store.list_sections(project.id).await?;
    let share = state.store.find_share_by_project(project.id).await?;
    Ok(ProjectDetail {
        status: status_name(project.status_id),
        share_url: share.map(|s| share_url(state.publisher.public_origin(), &s.token)),
        sections,
        project,
    })
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectDetail>>)> {
    let (project, sections) = create_project(state.store.as_ref(), &input).await?;
    tracing::info!(
        project_id = project.id,
        slug = %project.slug,
        sections = sections.len(),
        "Project created"
    );
    let data = ProjectDetail {
        status: status_name(project.status_id),
        share_url: None,
        sections,
        project,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/projects?include_archived=false
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<IncludeArchivedParams>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = state
        .store
        .list_projects()
        .await?
        .into_iter()
        .filter(|p| params.include_archived || p.status_id != STATUS_ARCHIVED)
        .collect();
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = state.store.get_project(id).await?.ok_or_else(|| not_found(id))?;
    let data = detail(&state, project).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    input.validate()?;
    let project = state
        .store
        .update_project(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/archive
///
/// Archived projects keep their share row; the public page stops rendering
/// them because only published projects are served.
pub async fn archive(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    state.composer.close(id).await;
    if !state.store.set_project_status(id, STATUS_ARCHIVED).await? {
        return Err(not_found(id));
    }
    let project = state.store.get_project(id).await?.ok_or_else(|| not_found(id))?;
    tracing::info!(project_id = id, "Project archived");
    Ok(Json(DataResponse { data: project }))
}

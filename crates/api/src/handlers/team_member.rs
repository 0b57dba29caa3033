//! Handlers for the `/team-members` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pitch_core::error::CoreError;
use pitch_core::types::DbId;
use pitch_db::models::team_member::{CreateTeamMember, TeamMember, UpdateTeamMember};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "TeamMember",
        id,
    })
}

/// POST /api/v1/team-members
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTeamMember>,
) -> AppResult<(StatusCode, Json<DataResponse<TeamMember>>)> {
    input.validate()?;
    let member = state.store.create_team_member(&input).await?;
    tracing::info!(team_member_id = member.id, "Team member created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// GET /api/v1/team-members
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<TeamMember>>>> {
    let members = state.store.list_team_members().await?;
    Ok(Json(DataResponse { data: members }))
}

/// GET /api/v1/team-members/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TeamMember>>> {
    let member = state.store.get_team_member(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: member }))
}

/// PUT /api/v1/team-members/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTeamMember>,
) -> AppResult<Json<DataResponse<TeamMember>>> {
    input.validate()?;
    let member = state
        .store
        .update_team_member(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/team-members/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.store.delete_team_member(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

//! Publish and share-link handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use pitch_composer::publish::PublishOutcome;
use pitch_core::types::DbId;
use serde::Serialize;

use crate::error::AppResult;
use crate::query::ConfirmParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ShareInfo {
    pub project_id: DbId,
    pub share_url: Option<String>,
}

/// POST /api/v1/projects/{id}/publish
///
/// A pending autosave of an open composer session is flushed first so the
/// published page shows the latest edits.
pub async fn publish(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PublishOutcome>>> {
    state.composer.flush(project_id).await;
    let outcome = state.publisher.publish(project_id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// DELETE /api/v1/projects/{id}/publish?confirm=true
///
/// Revokes the share token. Without `confirm=true` nothing changes.
pub async fn unpublish(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<ConfirmParams>,
) -> AppResult<Json<DataResponse<PublishOutcome>>> {
    let outcome = state.publisher.unpublish(project_id, params.confirm).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/projects/{id}/share
pub async fn share(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ShareInfo>>> {
    let share_url = state.publisher.share_url(project_id).await?;
    Ok(Json(DataResponse {
        data: ShareInfo {
            project_id,
            share_url,
        },
    }))
}

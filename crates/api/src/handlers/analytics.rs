//! Viewer analytics: ingestion from public pages and per-project summaries.
//!
//! Ingestion never fails the viewer. Unknown tokens are 404, but storage
//! errors are logged and the event is still acknowledged with 202.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use pitch_core::analytics::{summarize, validate_session_id, AnalyticsScope, AnalyticsSummary, SessionState, ViewerEvent};
use pitch_core::error::CoreError;
use pitch_core::types::DbId;
use pitch_db::models::analytics::SessionWrite;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::public::resolve_published;
use crate::response::DataResponse;
use crate::state::AppState;

/// One viewer event with the browser-generated session id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub session_id: String,
    pub event: ViewerEvent,
}

/// Fold `event` into the stored session, creating it on first sight.
///
/// Returns whether the session changed.
async fn record(
    state: &AppState,
    scope: AnalyticsScope,
    scope_id: DbId,
    envelope: &EventEnvelope,
) -> Result<bool, pitch_db::StoreError> {
    let now = Utc::now();
    let existing = state
        .store
        .find_analytics_session(scope.as_str(), scope_id, &envelope.session_id)
        .await?;
    let is_new = existing.is_none();
    let mut session = existing
        .map(|row| row.state())
        .unwrap_or_else(|| SessionState::new(now));

    let changed = session.apply(&envelope.event, now);
    if !changed && !is_new {
        return Ok(false);
    }
    state
        .store
        .upsert_analytics_session(&SessionWrite {
            scope: scope.as_str().to_string(),
            scope_id,
            session_id: envelope.session_id.clone(),
            state: session,
        })
        .await?;
    Ok(true)
}

async fn ingest(
    state: &AppState,
    scope: AnalyticsScope,
    scope_id: DbId,
    envelope: EventEnvelope,
) -> AppResult<StatusCode> {
    validate_session_id(&envelope.session_id)?;
    if let Err(e) = record(state, scope, scope_id, &envelope).await {
        tracing::warn!(
            scope = scope.as_str(),
            scope_id,
            session_id = %envelope.session_id,
            error = %e,
            "Failed to record analytics event"
        );
    }
    Ok(StatusCode::ACCEPTED)
}

/// POST /p/{token}/analytics
///
/// Only pages that are still served accept events.
pub async fn ingest_for_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(envelope): Json<EventEnvelope>,
) -> AppResult<StatusCode> {
    let project = resolve_published(&state, &token).await?;
    ingest(&state, AnalyticsScope::Project, project.id, envelope).await
}

/// POST /quotes/{id}/analytics
pub async fn ingest_for_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<DbId>,
    Json(envelope): Json<EventEnvelope>,
) -> AppResult<StatusCode> {
    state.store.get_quote(quote_id).await?.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Quote",
        id: quote_id,
    }))?;
    ingest(&state, AnalyticsScope::Quote, quote_id, envelope).await
}

/// GET /api/v1/projects/{id}/analytics
pub async fn project_summary(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<AnalyticsSummary>>> {
    state.store.get_project(project_id).await?.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Project",
        id: project_id,
    }))?;
    let sessions = state
        .store
        .list_analytics_sessions(AnalyticsScope::Project.as_str(), project_id)
        .await?;
    let states: Vec<SessionState> = sessions.iter().map(|s| s.state()).collect();
    Ok(Json(DataResponse {
        data: summarize(&states),
    }))
}

/// 404 for a token that does not resolve to a share.
pub(crate) fn share_not_found() -> AppError {
    AppError::NotFound("Share link not found".into())
}

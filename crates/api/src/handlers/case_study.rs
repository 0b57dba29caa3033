//! Handlers for the `/case-studies` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pitch_core::error::CoreError;
use pitch_core::types::DbId;
use pitch_db::models::case_study::{CaseStudy, CreateCaseStudy, UpdateCaseStudy};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "CaseStudy",
        id,
    })
}

/// POST /api/v1/case-studies
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCaseStudy>,
) -> AppResult<(StatusCode, Json<DataResponse<CaseStudy>>)> {
    input.validate()?;
    let case = state.store.create_case_study(&input).await?;
    tracing::info!(case_study_id = case.id, "Case study created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: case })))
}

/// GET /api/v1/case-studies
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<CaseStudy>>>> {
    let cases = state.store.list_case_studies().await?;
    Ok(Json(DataResponse { data: cases }))
}

/// GET /api/v1/case-studies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CaseStudy>>> {
    let case = state.store.get_case_study(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: case }))
}

/// PUT /api/v1/case-studies/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCaseStudy>,
) -> AppResult<Json<DataResponse<CaseStudy>>> {
    input.validate()?;
    let case = state
        .store
        .update_case_study(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: case }))
}

/// DELETE /api/v1/case-studies/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.store.delete_case_study(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

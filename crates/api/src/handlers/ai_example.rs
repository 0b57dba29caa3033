//! Handlers for the `/ai-examples` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pitch_core::error::CoreError;
use pitch_core::types::DbId;
use pitch_db::models::ai_example::{AiExample, AiExampleFilter, CreateAiExample, UpdateAiExample};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "AiExample",
        id,
    })
}

/// POST /api/v1/ai-examples
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateAiExample>,
) -> AppResult<(StatusCode, Json<DataResponse<AiExample>>)> {
    input.validate()?;
    let example = state.store.create_ai_example(&input).await?;
    tracing::info!(
        ai_example_id = example.id,
        section_type = %example.section_type,
        project_type = %example.project_type,
        "AI example created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: example })))
}

/// GET /api/v1/ai-examples?section_type=&project_type=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<AiExampleFilter>,
) -> AppResult<Json<DataResponse<Vec<AiExample>>>> {
    let examples = state.store.list_ai_examples(&filter).await?;
    Ok(Json(DataResponse { data: examples }))
}

/// GET /api/v1/ai-examples/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AiExample>>> {
    let example = state.store.get_ai_example(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: example }))
}

/// PUT /api/v1/ai-examples/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAiExample>,
) -> AppResult<Json<DataResponse<AiExample>>> {
    input.validate()?;
    let example = state
        .store
        .update_ai_example(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: example }))
}

/// DELETE /api/v1/ai-examples/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.store.delete_ai_example(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

//! Handlers for the `/collage-presets` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pitch_core::error::CoreError;
use pitch_core::types::DbId;
use pitch_db::models::collage_preset::{CollagePreset, CreateCollagePreset, UpdateCollagePreset};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "CollagePreset",
        id,
    })
}

/// Every referenced slot must be an existing image.
async fn ensure_images_exist(state: &AppState, slots: &[DbId]) -> AppResult<()> {
    if slots.is_empty() {
        return Ok(());
    }
    let found = state.store.get_images(slots).await?;
    for &id in slots {
        if !found.iter().any(|image| image.id == id) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Collage slot references unknown image {id}"
            ))));
        }
    }
    Ok(())
}

/// POST /api/v1/collage-presets
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCollagePreset>,
) -> AppResult<(StatusCode, Json<DataResponse<CollagePreset>>)> {
    input.validate()?;
    ensure_images_exist(&state, &[input.pos1, input.pos2, input.pos3, input.pos4, input.pos5]).await?;
    let preset = state.store.create_collage_preset(&input).await?;
    tracing::info!(preset_id = preset.id, "Collage preset created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: preset })))
}

/// GET /api/v1/collage-presets
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<CollagePreset>>>> {
    let presets = state.store.list_collage_presets().await?;
    Ok(Json(DataResponse { data: presets }))
}

/// GET /api/v1/collage-presets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CollagePreset>>> {
    let preset = state
        .store
        .get_collage_preset(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: preset }))
}

/// PUT /api/v1/collage-presets/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCollagePreset>,
) -> AppResult<Json<DataResponse<CollagePreset>>> {
    input.validate()?;
    let slots: Vec<DbId> = [input.pos1, input.pos2, input.pos3, input.pos4, input.pos5]
        .into_iter()
        .flatten()
        .collect();
    ensure_images_exist(&state, &slots).await?;
    let preset = state
        .store
        .update_collage_preset(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: preset }))
}

/// DELETE /api/v1/collage-presets/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.store.delete_collage_preset(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

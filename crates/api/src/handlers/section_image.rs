//! Section background images under `/sections/{id}/images`.
//!
//! Image attachments and their focal points are written straight to storage;
//! they are not part of the composer's debounced state.

use axum::extract::{Path, State};
use axum::Json;
use pitch_core::background::{background_style, BackgroundPosition, BackgroundStyle};
use pitch_core::error::CoreError;
use pitch_core::picker::{PickerKind, Selection};
use pitch_core::types::DbId;
use pitch_db::models::section::Section;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// An attached image with the style the renderer applies for it.
#[derive(Debug, Serialize)]
pub struct SectionImageView {
    pub image_id: DbId,
    pub url: String,
    pub order_index: i32,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub zoom: Option<f64>,
    pub style: BackgroundStyle,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceImagesRequest {
    pub image_ids: Vec<DbId>,
    /// Optional selection cap supplied by the picker.
    pub max: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub x: f64,
    pub y: f64,
    pub zoom: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PositionSaved {
    pub saved: bool,
    pub x: f64,
    pub y: f64,
    pub zoom: Option<f64>,
    pub style: BackgroundStyle,
}

async fn require_section(state: &AppState, section_id: DbId) -> AppResult<Section> {
    state
        .store
        .get_section(section_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Section",
            id: section_id,
        }))
}

async fn image_views(state: &AppState, section_id: DbId) -> AppResult<Vec<SectionImageView>> {
    let rows = state.store.list_section_images(section_id).await?;
    let mut placements: Vec<_> = rows.iter().map(|row| row.placement(&state.urls)).collect();
    placements.sort_by_key(|p| p.order_index);
    Ok(placements
        .iter()
        .enumerate()
        .map(|(index, p)| SectionImageView {
            image_id: p.image_id,
            url: p.url.clone(),
            order_index: p.order_index,
            position_x: p.position_x,
            position_y: p.position_y,
            zoom: p.zoom,
            style: background_style(&placements, index),
        })
        .collect())
}

/// GET /api/v1/sections/{id}/images
pub async fn list(
    State(state): State<AppState>,
    Path(section_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<SectionImageView>>>> {
    require_section(&state, section_id).await?;
    let data = image_views(&state, section_id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/sections/{id}/images
///
/// Replaces the whole attachment list in the given order. Stored positions
/// of re-attached images are reset.
pub async fn replace(
    State(state): State<AppState>,
    Path(section_id): Path<DbId>,
    Json(input): Json<ReplaceImagesRequest>,
) -> AppResult<Json<DataResponse<Vec<SectionImageView>>>> {
    require_section(&state, section_id).await?;
    let selection = Selection::from_confirmed(PickerKind::Image, &input.image_ids, input.max)?;

    let found = state.store.get_images(selection.ids()).await?;
    if let Some(&missing) = selection
        .ids()
        .iter()
        .find(|id| !found.iter().any(|image| image.id == **id))
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Image",
            id: missing,
        }));
    }

    let ids = selection.confirm();
    state.store.replace_section_images(section_id, &ids).await?;
    tracing::info!(section_id, count = ids.len(), "Section images replaced");

    let data = image_views(&state, section_id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/sections/{id}/images/{image_id}/position
///
/// Deployments whose schema lacks the position columns acknowledge the
/// request with `saved: false` instead of failing.
pub async fn save_position(
    State(state): State<AppState>,
    Path((section_id, image_id)): Path<(DbId, DbId)>,
    Json(input): Json<PositionRequest>,
) -> AppResult<Json<DataResponse<PositionSaved>>> {
    let position = BackgroundPosition::new(input.x, input.y, input.zoom)?;

    let saved = if state.store.supports_image_positions() {
        let attached = state
            .store
            .save_image_position(section_id, image_id, position.x, position.y, position.zoom)
            .await?;
        if !attached {
            return Err(AppError::NotFound(format!(
                "Image {image_id} is not attached to section {section_id}"
            )));
        }
        true
    } else {
        tracing::warn!(
            section_id,
            image_id,
            "Background positions are not supported by this schema; position not saved"
        );
        false
    };

    let style = image_views(&state, section_id)
        .await?
        .into_iter()
        .find(|view| view.image_id == image_id)
        .map(|view| view.style)
        .unwrap_or_default();

    Ok(Json(DataResponse {
        data: PositionSaved {
            saved,
            x: position.x,
            y: position.y,
            zoom: position.zoom,
            style,
        },
    }))
}

//! Handlers for the `/images` library resource.
//!
//! Rows are returned with their computed `public_url`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pitch_core::error::CoreError;
use pitch_core::types::DbId;
use pitch_db::models::image::{CreateImage, Image, ImageFilter, UpdateImage};
use pitch_db::storage::PublicUrls;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// An image row plus its public URL.
#[derive(Debug, Serialize)]
pub struct ImageView {
    #[serde(flatten)]
    pub image: Image,
    pub public_url: String,
}

impl ImageView {
    pub fn new(image: Image, urls: &PublicUrls) -> Self {
        let public_url = urls.url_for(&image.file_path);
        Self { image, public_url }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Image", id })
}

/// POST /api/v1/images
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateImage>,
) -> AppResult<(StatusCode, Json<DataResponse<ImageView>>)> {
    input.validate()?;
    let image = state.store.create_image(&input).await?;
    tracing::info!(image_id = image.id, file_path = %image.file_path, "Image registered");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ImageView::new(image, &state.urls),
        }),
    ))
}

/// GET /api/v1/images?search=&category=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ImageFilter>,
) -> AppResult<Json<DataResponse<Vec<ImageView>>>> {
    let images = state.store.list_images(&filter).await?;
    let data = images
        .into_iter()
        .map(|image| ImageView::new(image, &state.urls))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/images/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ImageView>>> {
    let image = state.store.get_image(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: ImageView::new(image, &state.urls),
    }))
}

/// PUT /api/v1/images/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateImage>,
) -> AppResult<Json<DataResponse<ImageView>>> {
    input.validate()?;
    let image = state
        .store
        .update_image(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: ImageView::new(image, &state.urls),
    }))
}

/// DELETE /api/v1/images/{id}
///
/// Images still referenced by a collage preset cannot be deleted (409).
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.store.delete_image(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

//! Picker selection rules for the library modals.
//!
//! Stateless: the client sends its local selection and gets the next state
//! back. Nothing is persisted until the caller confirms through the section
//! endpoints.

use axum::extract::Path;
use axum::Json;
use pitch_core::picker::{PickerKind, PickerState, Selection};
use pitch_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    #[serde(default)]
    pub selected: Vec<DbId>,
    pub id: DbId,
    /// Caller-supplied cap; kinds with a fixed cap ignore a missing value.
    pub max: Option<usize>,
}

/// POST /api/v1/pickers/{kind}/toggle
///
/// Adding to a full selection is rejected with 400.
pub async fn toggle(
    Path(kind): Path<PickerKind>,
    Json(request): Json<ToggleRequest>,
) -> AppResult<Json<DataResponse<PickerState>>> {
    let mut selection = Selection::seeded(kind, &request.selected, request.max);
    selection.toggle(request.id)?;
    Ok(Json(DataResponse {
        data: selection.state(),
    }))
}

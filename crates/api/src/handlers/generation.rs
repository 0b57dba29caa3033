//! Standalone AI generation endpoint.

use axum::extract::State;
use axum::Json;
use pitch_composer::generation::GeneratedText;
use pitch_core::generation::GenerationRequest;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/ai/generate
///
/// Body: `{ projectType, medium, targetAudience, sectionType }`. All four are
/// required.
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> AppResult<Json<DataResponse<GeneratedText>>> {
    let generated = state.generator.generate(&request).await?;
    tracing::info!(
        section_type = request.section_type.as_deref().unwrap_or_default(),
        examples = generated.example_count,
        "Generated section copy"
    );
    Ok(Json(DataResponse { data: generated }))
}

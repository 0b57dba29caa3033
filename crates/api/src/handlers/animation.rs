//! Scroll-animation frames for the page client.

use axum::Json;
use pitch_core::animation::{AnimatedSection, AnimationFrame, ScrollAnimator};
use pitch_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;

/// One tracked element measured after a scroll or resize event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedElement {
    pub section: AnimatedSection,
    /// Top edge relative to the viewport, in pixels.
    pub element_top: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRequest {
    #[serde(default)]
    pub edit_mode: bool,
    pub viewport_height: f64,
    pub viewport_width: f64,
    pub tracked: Vec<TrackedElement>,
}

#[derive(Debug, Serialize)]
pub struct SectionFrame {
    pub section: AnimatedSection,
    pub progress: f64,
    pub frame: AnimationFrame,
}

/// POST /api/v1/animation/frames
///
/// Edit mode suspends tracking: every frame is the static transform.
pub async fn frames(Json(request): Json<FrameRequest>) -> AppResult<Json<DataResponse<Vec<SectionFrame>>>> {
    if !(request.viewport_height > 0.0 && request.viewport_width > 0.0) {
        return Err(CoreError::Validation("Viewport size must be positive".into()).into());
    }

    let mut animator = ScrollAnimator::default();
    for element in &request.tracked {
        animator.on_scroll(element.section, element.element_top, request.viewport_height);
    }
    animator.set_edit_mode(request.edit_mode);

    let data = request
        .tracked
        .iter()
        .map(|element| SectionFrame {
            section: element.section,
            progress: animator.progress(element.section),
            frame: animator.frame(element.section, request.viewport_width),
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

//! Route definitions for section-scoped resources.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::section_image;
use crate::state::AppState;

/// Routes mounted at `/sections`.
///
/// ```text
/// GET    /{id}/images                          -> list
/// PUT    /{id}/images                          -> replace
/// PUT    /{id}/images/{image_id}/position      -> save_position
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/images",
            get(section_image::list).put(section_image::replace),
        )
        .route(
            "/{id}/images/{image_id}/position",
            put(section_image::save_position),
        )
}

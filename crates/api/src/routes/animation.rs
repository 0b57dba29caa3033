//! Route definitions for `/animation`.

use axum::routing::post;
use axum::Router;

use crate::handlers::animation;
use crate::state::AppState;

/// Routes mounted at `/animation`.
///
/// ```text
/// POST   /frames       -> frames
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/frames", post(animation::frames))
}

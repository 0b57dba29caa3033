//! Route definitions for `/pickers`.

use axum::routing::post;
use axum::Router;

use crate::handlers::picker;
use crate::state::AppState;

/// Routes mounted at `/pickers`.
///
/// ```text
/// POST   /{kind}/toggle    -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{kind}/toggle", post(picker::toggle))
}

//! Root-level routes reached from shared links (not under `/api/v1`).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{analytics, public};
use crate::state::AppState;

/// ```text
/// GET    /p/{token}                 -> page
/// POST   /p/{token}/analytics       -> ingest_for_share
/// POST   /p/{token}/quote/accept    -> accept_quote
/// POST   /quotes/{id}/analytics     -> ingest_for_quote
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/p/{token}", get(public::page))
        .route("/p/{token}/analytics", post(analytics::ingest_for_share))
        .route("/p/{token}/quote/accept", post(public::accept_quote))
        .route("/quotes/{id}/analytics", post(analytics::ingest_for_quote))
}

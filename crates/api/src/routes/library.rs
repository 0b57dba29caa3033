//! Route definitions for the reusable content library.
//!
//! Every resource exposes the same shape:
//!
//! ```text
//! GET    /           -> list
//! POST   /           -> create
//! GET    /{id}       -> get_by_id
//! PUT    /{id}       -> update
//! DELETE /{id}       -> delete
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::{ai_example, case_study, collage_preset, customer, image, team_member};
use crate::state::AppState;

/// Routes mounted at `/customers`.
pub fn customers() -> Router<AppState> {
    Router::new()
        .route("/", get(customer::list).post(customer::create))
        .route(
            "/{id}",
            get(customer::get_by_id)
                .put(customer::update)
                .delete(customer::delete),
        )
}

/// Routes mounted at `/case-studies`.
pub fn case_studies() -> Router<AppState> {
    Router::new()
        .route("/", get(case_study::list).post(case_study::create))
        .route(
            "/{id}",
            get(case_study::get_by_id)
                .put(case_study::update)
                .delete(case_study::delete),
        )
}

/// Routes mounted at `/team-members`.
pub fn team_members() -> Router<AppState> {
    Router::new()
        .route("/", get(team_member::list).post(team_member::create))
        .route(
            "/{id}",
            get(team_member::get_by_id)
                .put(team_member::update)
                .delete(team_member::delete),
        )
}

/// Routes mounted at `/images`. The list accepts `?search=` and `?category=`.
pub fn images() -> Router<AppState> {
    Router::new()
        .route("/", get(image::list).post(image::create))
        .route(
            "/{id}",
            get(image::get_by_id).put(image::update).delete(image::delete),
        )
}

/// Routes mounted at `/collage-presets`.
pub fn collage_presets() -> Router<AppState> {
    Router::new()
        .route("/", get(collage_preset::list).post(collage_preset::create))
        .route(
            "/{id}",
            get(collage_preset::get_by_id)
                .put(collage_preset::update)
                .delete(collage_preset::delete),
        )
}

/// Routes mounted at `/ai-examples`.
pub fn ai_examples() -> Router<AppState> {
    Router::new()
        .route("/", get(ai_example::list).post(ai_example::create))
        .route(
            "/{id}",
            get(ai_example::get_by_id)
                .put(ai_example::update)
                .delete(ai_example::delete),
        )
}

//! Route definitions for the `/projects` resource.
//!
//! Also nests the composer session under `/projects/{id}/composer`.

use axum::routing::{delete, get, patch, post, put};
use axum::Router;

use crate::handlers::{analytics, composer, project, publish};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                              -> list
/// POST   /                                              -> create
/// GET    /{id}                                          -> get_by_id
/// PUT    /{id}                                          -> update
/// POST   /{id}/archive                                  -> archive
///
/// POST   /{id}/publish                                  -> publish
/// DELETE /{id}/publish?confirm=true                     -> unpublish
/// GET    /{id}/share                                    -> share
/// GET    /{id}/analytics                                -> project_summary
///
/// GET    /{id}/composer                                 -> view
/// POST   /{id}/composer                                 -> open
/// DELETE /{id}/composer                                 -> close
/// POST   /{id}/composer/save                            -> save
/// POST   /{id}/composer/sections                        -> add_section
/// PUT    /{id}/composer/sections                        -> reorder
/// DELETE /{id}/composer/sections/{sid}                  -> remove_section
/// PATCH  /{id}/composer/sections/{sid}/content          -> update_content
/// PUT    /{id}/composer/sections/{sid}/visibility       -> set_visibility
/// POST   /{id}/composer/sections/{sid}/preset           -> apply_preset
/// POST   /{id}/composer/sections/{sid}/generate         -> generate
/// PUT    /{id}/composer/sections/{sid}/timeline/{index} -> edit_timeline_phase
/// POST   /{id}/composer/sections/{sid}/deliverables     -> add_deliverable
/// DELETE /{id}/composer/sections/{sid}/deliverables/{index} -> remove_deliverable
/// PUT    /{id}/composer/case-studies                    -> set_case_studies
/// PUT    /{id}/composer/team-members                    -> set_team_members
/// ```
pub fn router() -> Router<AppState> {
    let composer_routes = Router::new()
        .route(
            "/",
            get(composer::view).post(composer::open).delete(composer::close),
        )
        .route("/save", post(composer::save))
        .route(
            "/sections",
            post(composer::add_section).put(composer::reorder),
        )
        .route("/sections/{section_id}", delete(composer::remove_section))
        .route("/sections/{section_id}/content", patch(composer::update_content))
        .route("/sections/{section_id}/visibility", put(composer::set_visibility))
        .route("/sections/{section_id}/preset", post(composer::apply_preset))
        .route("/sections/{section_id}/generate", post(composer::generate))
        .route(
            "/sections/{section_id}/timeline/{index}",
            put(composer::edit_timeline_phase),
        )
        .route(
            "/sections/{section_id}/deliverables",
            post(composer::add_deliverable),
        )
        .route(
            "/sections/{section_id}/deliverables/{index}",
            delete(composer::remove_deliverable),
        )
        .route("/case-studies", put(composer::set_case_studies))
        .route("/team-members", put(composer::set_team_members));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/{id}", get(project::get_by_id).put(project::update))
        .route("/{id}/archive", post(project::archive))
        .route(
            "/{id}/publish",
            post(publish::publish).delete(publish::unpublish),
        )
        .route("/{id}/share", get(publish::share))
        .route("/{id}/analytics", get(analytics::project_summary))
        .nest("/{id}/composer", composer_routes)
}

pub mod ai;
pub mod animation;
pub mod health;
pub mod library;
pub mod picker;
pub mod project;
pub mod public;
pub mod section;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /customers                                       list, create
/// /customers/{id}                                  get, update, delete
/// /case-studies                                    list, create
/// /case-studies/{id}                               get, update, delete
/// /team-members                                    list, create
/// /team-members/{id}                               get, update, delete
/// /images                                          list (?search, ?category), create
/// /images/{id}                                     get, update, delete
/// /collage-presets                                 list, create
/// /collage-presets/{id}                            get, update, delete
/// /ai-examples                                     list (?section_type, ?project_type), create
/// /ai-examples/{id}                                get, update, delete
///
/// /projects                                        list, create (scaffolds sections)
/// /projects/{id}                                   get, update
/// /projects/{id}/archive                           archive (POST)
/// /projects/{id}/composer                          view, open (POST), close (DELETE)
/// /projects/{id}/composer/...                      edit operations, see project.rs
/// /projects/{id}/publish                           publish (POST), unpublish (DELETE)
/// /projects/{id}/share                             current share link
/// /projects/{id}/analytics                         viewer engagement summary
///
/// /sections/{id}/images                            list with styles, replace (PUT)
/// /sections/{id}/images/{image_id}/position        save background position (PUT)
///
/// /ai/generate                                     generate section copy (POST)
///
/// /animation/frames                                scroll samples to frames (POST)
/// /pickers/{kind}/toggle                           next picker state (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Library resources.
        .nest("/customers", library::customers())
        .nest("/case-studies", library::case_studies())
        .nest("/team-members", library::team_members())
        .nest("/images", library::images())
        .nest("/collage-presets", library::collage_presets())
        .nest("/ai-examples", library::ai_examples())
        // Projects, composer sessions and publishing.
        .nest("/projects", project::router())
        // Section-scoped background images.
        .nest("/sections", section::router())
        // Standalone text generation.
        .nest("/ai", ai::router())
        // Scroll-driven animation frames.
        .nest("/animation", animation::router())
        // Stateless picker rules.
        .nest("/pickers", picker::router())
}

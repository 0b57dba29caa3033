//! Public share page and the viewer actions it triggers.
//!
//! These routes are addressed by share token, not by id, and live outside
//! `/api/v1`. A token resolves only while its project is published.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pitch_composer::resources::{render_sections, SelectionOverrides};
use pitch_core::error::CoreError;
use pitch_core::publish::{is_well_formed_token, STATUS_PUBLISHED};
use pitch_core::render::{RenderMode, SectionView};
use pitch_db::models::project::Project;
use pitch_db::models::quote::{AcceptQuote, Contract, Quote};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::analytics::share_not_found;
use crate::response::DataResponse;
use crate::state::AppState;

/// The page a viewer sees.
#[derive(Debug, Serialize)]
pub struct PublicPage {
    pub title: String,
    pub client_name: Option<String>,
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Serialize)]
pub struct AcceptedQuote {
    pub quote: Quote,
    pub contract: Contract,
}

/// The published project behind `token`, or 404.
/// Resolve a share token to its project, which must still be published.
pub(crate) async fn resolve_published(state: &AppState, token: &str) -> AppResult<Project> {
    if !is_well_formed_token(token) {
        return Err(share_not_found());
    }
    let share = state
        .store
        .find_share_by_token(token)
        .await?
        .ok_or_else(share_not_found)?;
    let project = state
        .store
        .get_project(share.project_id)
        .await?
        .ok_or_else(share_not_found)?;
    if project.status_id != STATUS_PUBLISHED {
        tracing::debug!(project_id = project.id, "Share token resolves to an unpublished project");
        return Err(share_not_found());
    }
    Ok(project)
}

/// GET /p/{token}
pub async fn page(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<PublicPage>>> {
    let project = resolve_published(&state, &token).await?;
    let sections = state.store.list_sections(project.id).await?;
    let views = render_sections(
        state.store.as_ref(),
        &state.urls,
        project.id,
        &sections,
        RenderMode::View,
        &SelectionOverrides::default(),
    )
    .await;
    Ok(Json(DataResponse {
        data: PublicPage {
            title: project.title,
            client_name: project.client_name,
            sections: views,
        },
    }))
}

/// POST /p/{token}/quote/accept
///
/// Records the viewer's acceptance and opens a contract awaiting signature.
/// A project accepts at most one quote.
pub async fn accept_quote(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<AcceptQuote>,
) -> AppResult<(StatusCode, Json<DataResponse<AcceptedQuote>>)> {
    input.validate()?;
    let project = resolve_published(&state, &token).await?;

    if state.store.find_quote_by_project(project.id).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "A quote has already been accepted for this project".into(),
        )));
    }

    let quote = state.store.create_quote(project.id, &input).await?;
    let contract = state.store.create_contract(quote.id).await?;
    tracing::info!(
        project_id = project.id,
        quote_id = quote.id,
        contract_id = contract.id,
        "Quote accepted"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AcceptedQuote { quote, contract },
        }),
    ))
}

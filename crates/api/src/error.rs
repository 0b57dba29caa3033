use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pitch_composer::{ComposerError, GenerationError, PublishError, SaveError};
use pitch_core::error::CoreError;
use pitch_db::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, storage and composer errors and implements
/// [`IntoResponse`] to produce consistent `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// An explicit save failed part-way.
    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A missing resource that is not addressed by id.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<ComposerError> for AppError {
    fn from(err: ComposerError) -> Self {
        match err {
            ComposerError::Core(e) => AppError::Core(e),
            ComposerError::Store(e) => AppError::Store(e),
            ComposerError::Save(e) => AppError::Save(e),
            ComposerError::Generation(e) => AppError::Generation(e),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::from(err))
    }
}

type Classified = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Store(store) => classify_store_error(store),
            AppError::Save(save) => classify_save_error(save),

            AppError::Publish(publish) => match publish {
                PublishError::InFlight(_) => (StatusCode::CONFLICT, "IN_FLIGHT", publish.to_string()),
                PublishError::ConfirmationRequired => (
                    StatusCode::BAD_REQUEST,
                    "CONFIRMATION_REQUIRED",
                    publish.to_string(),
                ),
                PublishError::Core(core) => classify_core_error(core),
                PublishError::Store(store) => classify_store_error(store),
            },

            AppError::Generation(generation) => match generation {
                GenerationError::MissingParameter(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                GenerationError::NoExamples { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "NO_EXAMPLES",
                    generation.to_string(),
                ),
                GenerationError::Upstream(msg) => {
                    tracing::warn!(error = %msg, "Text generation upstream failure");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_ERROR",
                        "Text generation failed".to_string(),
                    )
                }
                GenerationError::Store(store) => classify_store_error(store),
            },

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> Classified {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(core: &CoreError) -> Classified {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
    }
}

fn classify_store_error(store: &StoreError) -> Classified {
    match store {
        StoreError::Database(err) => classify_sqlx_error(err),
        StoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        StoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        StoreError::Unavailable(msg) | StoreError::SchemaDrift(msg) => {
            tracing::error!(error = %msg, "Storage error");
            internal()
        }
    }
}

/// Name the failed write without leaking storage details.
fn classify_save_error(save: &SaveError) -> Classified {
    tracing::error!(error = %save, "Explicit save failed");
    let message = match save {
        SaveError::Section { section_id, .. } => format!("Failed to save section {section_id}"),
        SaveError::CaseStudies { section_id, .. } => {
            format!("Failed to save case studies for section {section_id}")
        }
        SaveError::TeamMembers { section_id, .. } => {
            format!("Failed to save team members for section {section_id}")
        }
        SaveError::Project { project_id, .. } => format!("Failed to update project {project_id}"),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, "SAVE_FAILED", message)
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign key violations map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            match db_err.code().as_deref() {
                // PostgreSQL unique constraint violation.
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    if constraint.starts_with("uq_") {
                        return (
                            StatusCode::CONFLICT,
                            "CONFLICT",
                            format!("Duplicate value violates unique constraint: {constraint}"),
                        );
                    }
                }
                // Foreign key violation: referenced row missing or still in use.
                Some("23503") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Operation violates reference constraint: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

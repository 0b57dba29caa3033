use pitch_core::error::CoreError;
use pitch_core::types::DbId;
use pitch_db::StoreError;

/// Which write of a save failed. Writes after it were not attempted.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Failed to save section {section_id}: {source}")]
    Section {
        section_id: DbId,
        #[source]
        source: StoreError,
    },

    #[error("Failed to save case study selection for section {section_id}: {source}")]
    CaseStudies {
        section_id: DbId,
        #[source]
        source: StoreError,
    },

    #[error("Failed to save team selection for section {section_id}: {source}")]
    TeamMembers {
        section_id: DbId,
        #[source]
        source: StoreError,
    },

    #[error("Failed to update project {project_id}: {source}")]
    Project {
        project_id: DbId,
        #[source]
        source: StoreError,
    },
}

/// Errors from the publish controller. Status is left as it was.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("A publish action for project {0} is already in progress")]
    InFlight(DbId),

    #[error("Unpublishing requires confirmation: the shared link will stop working")]
    ConfirmationRequired,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the AI generation bridge.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// A required parameter was missing; nothing was fetched or sent.
    #[error("{0}")]
    MissingParameter(String),

    #[error("No examples found for section type '{section_type}' and project type '{project_type}'")]
    NoExamples {
        section_type: String,
        project_type: String,
    },

    /// The completion endpoint failed or answered with an error.
    #[error("Text generation failed: {0}")]
    Upstream(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from composer session operations.
#[derive(Debug, thiserror::Error)]
pub enum ComposerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

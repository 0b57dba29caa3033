//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?confirm=true` on destructive actions that need an explicit yes.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirm: bool,
}

/// `?include_archived=true` on the project list.
#[derive(Debug, Default, Deserialize)]
pub struct IncludeArchivedParams {
    #[serde(default)]
    pub include_archived: bool,
}

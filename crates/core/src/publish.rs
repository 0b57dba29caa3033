//! Project publication state machine and share tokens.
//!
//! This module lives in `core` (zero internal deps) so both the repository
//! layer and the publish controller agree on status ids and transitions.

use rand::distr::Alphanumeric;
use rand::Rng;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status ids
// ---------------------------------------------------------------------------

/// Project status ids matching `project_statuses` seed data (1-based SMALLSERIAL).
pub const STATUS_DRAFT: i16 = 1;
pub const STATUS_PUBLISHED: i16 = 2;
pub const STATUS_ARCHIVED: i16 = 3;

/// Human-readable name for a status id.
pub fn status_name(status_id: i16) -> &'static str {
    match status_id {
        STATUS_DRAFT => "draft",
        STATUS_PUBLISHED => "published",
        STATUS_ARCHIVED => "archived",
        _ => "unknown",
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Transitions the publish controller performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    Publish,
    Unpublish,
}

impl PublishAction {
    pub fn target_status(self) -> i16 {
        match self {
            PublishAction::Publish => STATUS_PUBLISHED,
            PublishAction::Unpublish => STATUS_DRAFT,
        }
    }
}

/// Check that `action` may be applied to a project in `from_status`.
///
/// Archived projects are outside the controller's reach. Publishing an
/// already-published project is allowed (it re-surfaces the existing link);
/// unpublishing requires the project to be published.
pub fn validate_transition(from_status: i16, action: PublishAction) -> Result<(), CoreError> {
    match (from_status, action) {
        (STATUS_DRAFT | STATUS_PUBLISHED, PublishAction::Publish) => Ok(()),
        (STATUS_PUBLISHED, PublishAction::Unpublish) => Ok(()),
        (STATUS_DRAFT, PublishAction::Unpublish) => Err(CoreError::Conflict(
            "Project is not published".to_string(),
        )),
        (other, _) => Err(CoreError::Conflict(format!(
            "Cannot change publication of a project with status '{}'",
            status_name(other)
        ))),
    }
}

// ---------------------------------------------------------------------------
// Share tokens
// ---------------------------------------------------------------------------

/// Length of generated share tokens.
pub const SHARE_TOKEN_LEN: usize = 32;

/// Generate a random opaque share token (alphanumeric).
pub fn generate_share_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SHARE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Public URL of a shared page: `{origin}/p/{token}`.
pub fn share_url(origin: &str, token: &str) -> String {
    format!("{}/p/{token}", origin.trim_end_matches('/'))
}

/// Whether `token` has the shape of a generated share token.
///
/// Used to reject obviously bogus lookups before touching storage.
pub fn is_well_formed_token(token: &str) -> bool {
    !token.is_empty() && token.len() <= 128 && token.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_can_be_published() {
        assert!(validate_transition(STATUS_DRAFT, PublishAction::Publish).is_ok());
    }

    #[test]
    fn published_can_be_republished_and_unpublished() {
        assert!(validate_transition(STATUS_PUBLISHED, PublishAction::Publish).is_ok());
        assert!(validate_transition(STATUS_PUBLISHED, PublishAction::Unpublish).is_ok());
    }

    #[test]
    fn draft_cannot_be_unpublished() {
        assert!(validate_transition(STATUS_DRAFT, PublishAction::Unpublish).is_err());
    }

    #[test]
    fn archived_is_out_of_reach() {
        assert!(validate_transition(STATUS_ARCHIVED, PublishAction::Publish).is_err());
        assert!(validate_transition(STATUS_ARCHIVED, PublishAction::Unpublish).is_err());
    }

    #[test]
    fn tokens_are_random_and_well_formed() {
        let a = generate_share_token();
        let b = generate_share_token();
        assert_eq!(a.len(), SHARE_TOKEN_LEN);
        assert!(is_well_formed_token(&a));
        assert_ne!(a, b);
    }

    #[test]
    fn share_url_joins_origin_and_token() {
        assert_eq!(share_url("https://pitch.studio", "abc"), "https://pitch.studio/p/abc");
        assert_eq!(share_url("https://pitch.studio/", "abc"), "https://pitch.studio/p/abc");
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(!is_well_formed_token(""));
        assert!(!is_well_formed_token("../etc"));
        assert!(!is_well_formed_token(&"a".repeat(200)));
    }

    #[test]
    fn status_names() {
        assert_eq!(status_name(STATUS_DRAFT), "draft");
        assert_eq!(status_name(STATUS_PUBLISHED), "published");
        assert_eq!(status_name(99), "unknown");
    }
}

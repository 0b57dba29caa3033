//! Publish controller: draft/published toggling and share tokens.
//!
//! Publishing reuses the project's existing share token when there is one, so
//! links handed out earlier keep working. Unpublishing deletes the share row,
//! which immediately makes `{origin}/p/{token}` resolve to "not found".
//!
//! The status flip and the share-row write are two separate storage calls.
//! A failure between them is surfaced but not compensated.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use pitch_core::error::CoreError;
use pitch_core::publish::{
    generate_share_token, share_url, status_name, validate_transition, PublishAction,
};
use pitch_core::types::DbId;
use pitch_db::models::project::Project;
use pitch_db::PitchStore;
use serde::Serialize;

use crate::error::PublishError;

/// Result of a publish or unpublish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    pub project_id: DbId,
    pub status: &'static str,
    /// `None` after unpublishing.
    pub share_url: Option<String>,
    pub token: Option<String>,
    /// Whether an existing token was reused.
    pub reused_token: bool,
}

/// Guards publish/unpublish with one in-flight flag per project.
pub struct PublishController {
    store: Arc<dyn PitchStore>,
    public_origin: String,
    in_flight: Arc<Mutex<HashSet<DbId>>>,
}

/// Clears the in-flight flag on drop.
struct InFlightGuard {
    project_id: DbId,
    in_flight: Arc<Mutex<HashSet<DbId>>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.project_id);
    }
}

impl PublishController {
    pub fn new(store: Arc<dyn PitchStore>, public_origin: impl Into<String>) -> Self {
        Self {
            store,
            public_origin: public_origin.into(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn public_origin(&self) -> &str {
        &self.public_origin
    }

    /// Whether a publish action for `project_id` is running.
    pub fn is_in_flight(&self, project_id: DbId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&project_id)
    }

    fn begin(&self, project_id: DbId) -> Result<InFlightGuard, PublishError> {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(project_id) {
            return Err(PublishError::InFlight(project_id));
        }
        Ok(InFlightGuard {
            project_id,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    async fn load_project(&self, project_id: DbId) -> Result<Project, PublishError> {
        self.store
            .get_project(project_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Project",
                    id: project_id,
                }
                .into()
            })
    }

    /// draft → published. Reuses the existing token if one exists.
    pub async fn publish(&self, project_id: DbId) -> Result<PublishOutcome, PublishError> {
        let _guard = self.begin(project_id)?;
        let project = self.load_project(project_id).await?;
        validate_transition(project.status_id, PublishAction::Publish)?;

        let (token, reused_token) = match self.store.find_share_by_project(project_id).await? {
            Some(share) => (share.token, true),
            None => {
                let token = generate_share_token();
                let share = self.store.create_share(project_id, &token).await.map_err(|e| {
                    tracing::error!(project_id, error = %e, "Failed to create share token");
                    e
                })?;
                (share.token, false)
            }
        };

        let target = PublishAction::Publish.target_status();
        if project.status_id != target {
            self.store
                .set_project_status(project_id, target)
                .await
                .map_err(|e| {
                    tracing::error!(project_id, error = %e, "Failed to set project status to published");
                    e
                })?;
        }

        tracing::info!(project_id, reused_token, "Project published");
        Ok(PublishOutcome {
            project_id,
            status: status_name(target),
            share_url: Some(share_url(&self.public_origin, &token)),
            token: Some(token),
            reused_token,
        })
    }

    /// published → draft. The caller must confirm that the link stops working.
    pub async fn unpublish(&self, project_id: DbId, confirmed: bool) -> Result<PublishOutcome, PublishError> {
        if !confirmed {
            return Err(PublishError::ConfirmationRequired);
        }
        let _guard = self.begin(project_id)?;
        let project = self.load_project(project_id).await?;
        validate_transition(project.status_id, PublishAction::Unpublish)?;

        let deleted = self
            .store
            .delete_share_by_project(project_id)
            .await
            .map_err(|e| {
                tracing::error!(project_id, error = %e, "Failed to delete share token");
                e
            })?;
        if !deleted {
            tracing::warn!(project_id, "Published project had no share token");
        }

        let target = PublishAction::Unpublish.target_status();
        self.store
            .set_project_status(project_id, target)
            .await
            .map_err(|e| {
                tracing::error!(project_id, error = %e, "Failed to set project status to draft");
                e
            })?;

        tracing::info!(project_id, "Project unpublished");
        Ok(PublishOutcome {
            project_id,
            status: status_name(target),
            share_url: None,
            token: None,
            reused_token: false,
        })
    }

    /// The project's current share URL, if it has a token.
    pub async fn share_url(&self, project_id: DbId) -> Result<Option<String>, PublishError> {
        self.load_project(project_id).await?;
        Ok(self
            .store
            .find_share_by_project(project_id)
            .await?
            .map(|share| share_url(&self.public_origin, &share.token)))
    }
}

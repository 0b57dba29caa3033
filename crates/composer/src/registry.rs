//! One composer session per project.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pitch_core::error::CoreError;
use pitch_core::types::DbId;
use pitch_db::PitchStore;

use crate::error::ComposerError;
use crate::session::ComposerSession;

/// Tracks the open composer sessions.
pub struct ComposerRegistry {
    store: Arc<dyn PitchStore>,
    quiet_period: Duration,
    sessions: Mutex<HashMap<DbId, ComposerSession>>,
}

impl ComposerRegistry {
    pub fn new(store: Arc<dyn PitchStore>, quiet_period: Duration) -> Self {
        Self {
            store,
            quiet_period,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<DbId, ComposerSession>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open edit mode for `project_id`, or return the session already open.
    pub async fn open(&self, project_id: DbId) -> Result<ComposerSession, ComposerError> {
        if let Some(existing) = self.get(project_id) {
            return Ok(existing);
        }
        let session = ComposerSession::open(Arc::clone(&self.store), project_id, self.quiet_period).await?;
        // Two concurrent opens: keep whichever registered first.
        let mut sessions = self.sessions();
        Ok(sessions.entry(project_id).or_insert(session).clone())
    }

    pub fn get(&self, project_id: DbId) -> Option<ComposerSession> {
        self.sessions().get(&project_id).cloned()
    }

    /// The open session, or a conflict if the project is not being edited.
    pub fn require(&self, project_id: DbId) -> Result<ComposerSession, CoreError> {
        self.get(project_id).ok_or_else(|| {
            CoreError::Conflict(format!("Project {project_id} is not open for editing"))
        })
    }

    /// Leave edit mode, flushing any pending autosave. Returns `false` if no
    /// session was open.
    pub async fn close(&self, project_id: DbId) -> bool {
        let session = self.sessions().remove(&project_id);
        match session {
            Some(session) => {
                session.close().await;
                true
            }
            None => false,
        }
    }

    /// Flush any pending autosave without leaving edit mode.
    pub async fn flush(&self, project_id: DbId) -> bool {
        match self.get(project_id) {
            Some(session) => session.flush().await,
            None => false,
        }
    }

    pub fn open_count(&self) -> usize {
        self.sessions().len()
    }

    /// Close every session. Called on shutdown.
    pub async fn close_all(&self) {
        let sessions: Vec<ComposerSession> = self.sessions().drain().map(|(_, s)| s).collect();
        let count = sessions.len();
        for session in sessions {
            session.close().await;
        }
        if count > 0 {
            tracing::info!(count, "Closed composer sessions");
        }
    }
}

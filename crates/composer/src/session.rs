//! Composer session: server-side edit mode for one project.
//!
//! The session owns the latest in-memory section list and the picked
//! case-study / team-member selections. Every mutation requests
//! [`ComposerSession::auto_save`], which re-arms a single-slot debounce timer.
//! When the timer fires, [`ComposerSession::handle_save`] snapshots the state
//! *at that moment*, so edits made after scheduling are included.
//!
//! A save writes, in order: every section, the case-study selection, the team
//! selection, and the project's `updated_at`. The first failure aborts the
//! remaining writes. Auto-triggered saves only log failures; explicit saves
//! return them.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use pitch_core::content;
use pitch_core::debounce::Debouncer;
use pitch_core::error::CoreError;
use pitch_core::picker::{PickerKind, Selection};
use pitch_core::render::{RenderMode, SectionView};
use pitch_core::section_type::{validate_can_add, SectionType};
use pitch_core::types::DbId;
use pitch_db::models::section::{CreateSection, Section, SectionWrite};
use pitch_db::storage::PublicUrls;
use pitch_db::{PitchStore, StoreError};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ComposerError, SaveError};
use crate::resources::{render_sections, SelectionOverrides};

/// Ordered library ids attached to one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationSelection {
    pub section_id: DbId,
    pub ids: Vec<DbId>,
}

/// What a completed save wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub sections: usize,
    pub case_studies: Option<usize>,
    pub team_members: Option<usize>,
    /// `false` when a silent save failed.
    pub persisted: bool,
}

impl SaveReport {
    fn failed() -> Self {
        Self {
            sections: 0,
            case_studies: None,
            team_members: None,
            persisted: false,
        }
    }
}

#[derive(Debug, Clone)]
struct EditState {
    edit_mode: bool,
    sections: Vec<Section>,
    case_studies: Option<AssociationSelection>,
    team_members: Option<AssociationSelection>,
}

impl EditState {
    fn section_mut(&mut self, section_id: DbId) -> Result<&mut Section, CoreError> {
        self.sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or(CoreError::NotFound {
                entity: "Section",
                id: section_id,
            })
    }

    fn first_of(&self, section_type: SectionType) -> Option<DbId> {
        self.sections
            .iter()
            .filter(|s| s.section_type == section_type.as_str())
            .min_by_key(|s| s.order_index)
            .map(|s| s.id)
    }
}

struct Inner {
    project_id: DbId,
    store: Arc<dyn PitchStore>,
    state: Mutex<EditState>,
    debouncer: Debouncer,
    /// Serializes saves so a later save always writes a later snapshot.
    save_gate: tokio::sync::Mutex<()>,
}

/// Handle to a project's composer session. Cheap to clone.
#[derive(Clone)]
pub struct ComposerSession {
    inner: Arc<Inner>,
}

impl ComposerSession {
    /// Enter edit mode: load the project's sections and associations.
    pub async fn open(
        store: Arc<dyn PitchStore>,
        project_id: DbId,
        quiet_period: Duration,
    ) -> Result<Self, ComposerError> {
        if store.get_project(project_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }
            .into());
        }

        let sections = store.list_sections(project_id).await?;
        let mut state = EditState {
            edit_mode: true,
            sections,
            case_studies: None,
            team_members: None,
        };

        if let Some(section_id) = state.first_of(SectionType::Cases) {
            let ids = store
                .list_section_case_studies(section_id)
                .await?
                .iter()
                .map(|c| c.id)
                .collect();
            state.case_studies = Some(AssociationSelection { section_id, ids });
        }
        if let Some(section_id) = state.first_of(SectionType::Team) {
            let ids = store
                .list_section_team_members(section_id)
                .await?
                .iter()
                .map(|m| m.id)
                .collect();
            state.team_members = Some(AssociationSelection { section_id, ids });
        }

        tracing::info!(project_id, sections = state.sections.len(), "Composer session opened");

        Ok(Self {
            inner: Arc::new(Inner {
                project_id,
                store,
                state: Mutex::new(state),
                debouncer: Debouncer::new(quiet_period),
                save_gate: tokio::sync::Mutex::new(()),
            }),
        })
    }

    pub fn project_id(&self) -> DbId {
        self.inner.project_id
    }

    pub fn is_edit_mode(&self) -> bool {
        self.inner.lock().edit_mode
    }

    /// Current in-memory sections in display order.
    pub fn sections(&self) -> Vec<Section> {
        let mut sections = self.inner.lock().sections.clone();
        sections.sort_by_key(|s| (s.order_index, s.id));
        sections
    }

    pub fn section(&self, section_id: DbId) -> Option<Section> {
        self.inner
            .lock()
            .sections
            .iter()
            .find(|s| s.id == section_id)
            .cloned()
    }

    pub fn case_study_selection(&self) -> Option<AssociationSelection> {
        self.inner.lock().case_studies.clone()
    }

    pub fn team_selection(&self) -> Option<AssociationSelection> {
        self.inner.lock().team_members.clone()
    }

    pub fn has_pending_save(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /* ---------------------------------------------------------------------
       Autosave
       --------------------------------------------------------------------- */

    /// Request a debounced save. No-op outside edit mode.
    pub fn auto_save(&self) {
        if !self.is_edit_mode() {
            return;
        }
        let inner = Arc::clone(&self.inner);
        self.inner.debouncer.schedule(move || async move {
            // Failures are logged inside; auto-saves never surface them.
            let _ = inner.handle_save(false).await;
        });
    }

    /// Persist the latest state now.
    ///
    /// With `show_user_feedback` the first failure is returned; otherwise it
    /// is only logged and the report has `persisted == false`.
    pub async fn handle_save(&self, show_user_feedback: bool) -> Result<SaveReport, SaveError> {
        self.inner.handle_save(show_user_feedback).await
    }

    /// Leave edit mode, firing any pending autosave immediately.
    ///
    /// Returns whether a pending save was flushed.
    pub async fn close(&self) -> bool {
        self.inner.lock().edit_mode = false;
        let flushed = self.inner.debouncer.flush().await;
        tracing::info!(project_id = self.inner.project_id, flushed, "Composer session closed");
        flushed
    }

    /// Fire any pending autosave now and wait for it.
    pub async fn flush(&self) -> bool {
        self.inner.debouncer.flush().await
    }

    /* ---------------------------------------------------------------------
       In-memory edits
       --------------------------------------------------------------------- */

    /// Partial content update: set `key`, keep every other key untouched.
    pub fn update_content(&self, section_id: DbId, key: &str, value: Value) -> Result<Section, CoreError> {
        if key.trim().is_empty() {
            return Err(CoreError::Validation("Content key must not be empty".to_string()));
        }
        self.edit_section(section_id, |section| {
            section.content = content::merge_key(&section.content, key, value);
            Ok(())
        })
    }

    pub fn set_visibility(&self, section_id: DbId, visible: bool) -> Result<Section, CoreError> {
        self.edit_section(section_id, |section| {
            section.visible = visible;
            Ok(())
        })
    }

    /// Replace one of the four timeline phases.
    pub fn edit_timeline_phase(
        &self,
        section_id: DbId,
        index: usize,
        title: &str,
        text: &str,
    ) -> Result<Section, CoreError> {
        self.edit_section(section_id, |section| {
            expect_type(section, SectionType::Timeline)?;
            section.content = content::with_timeline_item(&section.content, index, title, text)
                .ok_or_else(|| {
                    CoreError::Validation(format!("Timeline phase index {index} is out of range"))
                })?;
            Ok(())
        })
    }

    pub fn add_deliverable(&self, section_id: DbId) -> Result<Section, CoreError> {
        self.edit_section(section_id, |section| {
            expect_type(section, SectionType::Deliverables)?;
            section.content = content::with_deliverable_added(&section.content);
            Ok(())
        })
    }

    pub fn remove_deliverable(&self, section_id: DbId, index: usize) -> Result<Section, CoreError> {
        self.edit_section(section_id, |section| {
            expect_type(section, SectionType::Deliverables)?;
            section.content = content::with_deliverable_removed(&section.content, index)
                .ok_or_else(|| {
                    CoreError::Validation(format!("Deliverable index {index} is out of range"))
                })?;
            Ok(())
        })
    }

    /// Reorder sections. `order` must list every section exactly once.
    pub fn reorder(&self, order: &[DbId]) -> Result<Vec<Section>, CoreError> {
        {
            let mut state = self.inner.lock();
            ensure_edit_mode(&state)?;
            let mut current: Vec<DbId> = state.sections.iter().map(|s| s.id).collect();
            let mut requested = order.to_vec();
            current.sort_unstable();
            requested.sort_unstable();
            if current != requested {
                return Err(CoreError::Validation(
                    "Section order must list every section of the project exactly once".to_string(),
                ));
            }
            for section in state.sections.iter_mut() {
                if let Some(pos) = order.iter().position(|&id| id == section.id) {
                    section.order_index = pos as i32;
                }
            }
        }
        self.auto_save();
        Ok(self.sections())
    }

    /* ---------------------------------------------------------------------
       Edits that touch storage immediately
       --------------------------------------------------------------------- */

    /// Append a section of `section_type`. The row is created right away so
    /// it has an id; its content follows with the next save.
    pub async fn add_section(&self, section_type: &str) -> Result<Section, ComposerError> {
        let section_type: SectionType = section_type.parse()?;
        let order_index = {
            let state = self.inner.lock();
            ensure_edit_mode(&state)?;
            let existing = state
                .sections
                .iter()
                .filter_map(|s| s.section_type.parse::<SectionType>().ok());
            validate_can_add(existing, section_type)?;
            state.sections.iter().map(|s| s.order_index + 1).max().unwrap_or(0)
        };

        let section = self
            .inner
            .store
            .create_section(&CreateSection {
                project_id: self.inner.project_id,
                section_type: section_type.as_str().to_string(),
                content: Value::Object(Default::default()),
                visible: true,
                order_index,
            })
            .await
            .map_err(|e| {
                tracing::error!(project_id = self.inner.project_id, error = %e, "Failed to add section");
                e
            })?;

        {
            let mut state = self.inner.lock();
            state.sections.push(section.clone());
            if section_type == SectionType::Cases && state.case_studies.is_none() {
                state.case_studies = Some(AssociationSelection { section_id: section.id, ids: vec![] });
            }
            if section_type == SectionType::Team && state.team_members.is_none() {
                state.team_members = Some(AssociationSelection { section_id: section.id, ids: vec![] });
            }
        }
        tracing::info!(project_id = self.inner.project_id, section_id = section.id, section_type = %section_type, "Section added");
        self.auto_save();
        Ok(section)
    }

    pub async fn remove_section(&self, section_id: DbId) -> Result<(), ComposerError> {
        {
            let state = self.inner.lock();
            ensure_edit_mode(&state)?;
            if !state.sections.iter().any(|s| s.id == section_id) {
                return Err(CoreError::NotFound {
                    entity: "Section",
                    id: section_id,
                }
                .into());
            }
        }

        self.inner.store.delete_section(section_id).await.map_err(|e| {
            tracing::error!(section_id, error = %e, "Failed to remove section");
            e
        })?;

        {
            let mut state = self.inner.lock();
            state.sections.retain(|s| s.id != section_id);
            if state.case_studies.as_ref().is_some_and(|c| c.section_id == section_id) {
                state.case_studies = state
                    .first_of(SectionType::Cases)
                    .map(|id| AssociationSelection { section_id: id, ids: vec![] });
            }
            if state.team_members.as_ref().is_some_and(|c| c.section_id == section_id) {
                state.team_members = state
                    .first_of(SectionType::Team)
                    .map(|id| AssociationSelection { section_id: id, ids: vec![] });
            }
        }
        tracing::info!(project_id = self.inner.project_id, section_id, "Section removed");
        self.auto_save();
        Ok(())
    }

    /// Confirm the case-study picker (at most four, order kept).
    pub async fn set_case_studies(&self, ids: &[DbId]) -> Result<AssociationSelection, ComposerError> {
        let selection = Selection::from_confirmed(PickerKind::CaseStudy, ids, None)?;
        for &id in selection.ids() {
            if self.inner.store.get_case_study(id).await?.is_none() {
                return Err(CoreError::NotFound { entity: "CaseStudy", id }.into());
            }
        }
        let result = {
            let mut state = self.inner.lock();
            ensure_edit_mode(&state)?;
            let section_id = state.first_of(SectionType::Cases).ok_or_else(|| {
                CoreError::Validation("Project has no cases section".to_string())
            })?;
            let picked = AssociationSelection {
                section_id,
                ids: selection.confirm(),
            };
            state.case_studies = Some(picked.clone());
            picked
        };
        self.auto_save();
        Ok(result)
    }

    /// Confirm the team-member picker.
    pub async fn set_team_members(&self, ids: &[DbId]) -> Result<AssociationSelection, ComposerError> {
        let selection = Selection::from_confirmed(PickerKind::TeamMember, ids, None)?;
        for &id in selection.ids() {
            if self.inner.store.get_team_member(id).await?.is_none() {
                return Err(CoreError::NotFound { entity: "TeamMember", id }.into());
            }
        }
        let result = {
            let mut state = self.inner.lock();
            ensure_edit_mode(&state)?;
            let section_id = state.first_of(SectionType::Team).ok_or_else(|| {
                CoreError::Validation("Project has no team section".to_string())
            })?;
            let picked = AssociationSelection {
                section_id,
                ids: selection.confirm(),
            };
            state.team_members = Some(picked.clone());
            picked
        };
        self.auto_save();
        Ok(result)
    }

    /// Copy a collage preset's five images into an example-work section.
    pub async fn apply_collage_preset(&self, section_id: DbId, preset_id: DbId) -> Result<Section, ComposerError> {
        let preset = self
            .inner
            .store
            .get_collage_preset(preset_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "CollagePreset",
                id: preset_id,
            })?;
        let slots = preset.slots();
        Ok(self.edit_section(section_id, |section| {
            expect_type(section, SectionType::ExampleWork)?;
            section.content = content::with_collage_preset(&section.content, preset.id, slots);
            Ok(())
        })?)
    }

    /// Edit-mode render of the in-memory state.
    pub async fn view(&self, urls: &PublicUrls) -> Vec<SectionView> {
        let (sections, cases, team) = {
            let state = self.inner.lock();
            (
                state.sections.clone(),
                state.case_studies.clone(),
                state.team_members.clone(),
            )
        };
        let overrides = SelectionOverrides {
            case_studies: cases.as_ref().map(|c| (c.section_id, c.ids.as_slice())),
            team_members: team.as_ref().map(|t| (t.section_id, t.ids.as_slice())),
        };
        render_sections(
            self.inner.store.as_ref(),
            urls,
            self.inner.project_id,
            &sections,
            RenderMode::Edit,
            &overrides,
        )
        .await
    }

    /// Apply `edit` to one section, then request an autosave.
    fn edit_section(
        &self,
        section_id: DbId,
        edit: impl FnOnce(&mut Section) -> Result<(), CoreError>,
    ) -> Result<Section, CoreError> {
        let updated = {
            let mut state = self.inner.lock();
            ensure_edit_mode(&state)?;
            let section = state.section_mut(section_id)?;
            edit(section)?;
            section.clone()
        };
        self.auto_save();
        Ok(updated)
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, EditState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn handle_save(&self, show_user_feedback: bool) -> Result<SaveReport, SaveError> {
        let _gate = self.save_gate.lock().await;
        // Read the state as it is now, not as it was when the save was requested.
        let snapshot = self.lock().clone();

        match self.persist(&snapshot).await {
            Ok(report) => {
                tracing::debug!(project_id = self.project_id, sections = report.sections, "Composer state saved");
                Ok(report)
            }
            Err(e) => {
                tracing::error!(project_id = self.project_id, error = %e, show_user_feedback, "Composer save failed");
                if show_user_feedback {
                    Err(e)
                } else {
                    Ok(SaveReport::failed())
                }
            }
        }
    }

    async fn persist(&self, snapshot: &EditState) -> Result<SaveReport, SaveError> {
        for section in &snapshot.sections {
            let saved = self
                .store
                .save_section(section.id, &SectionWrite::from(section))
                .await
                .map_err(|source| SaveError::Section {
                    section_id: section.id,
                    source,
                })?;
            if !saved {
                return Err(SaveError::Section {
                    section_id: section.id,
                    source: StoreError::NotFound {
                        entity: "Section",
                        id: section.id,
                    },
                });
            }
        }

        let case_studies = match &snapshot.case_studies {
            Some(sel) => {
                self.store
                    .replace_section_case_studies(sel.section_id, &sel.ids)
                    .await
                    .map_err(|source| SaveError::CaseStudies {
                        section_id: sel.section_id,
                        source,
                    })?;
                Some(sel.ids.len())
            }
            None => None,
        };

        let team_members = match &snapshot.team_members {
            Some(sel) => {
                self.store
                    .replace_section_team_members(sel.section_id, &sel.ids)
                    .await
                    .map_err(|source| SaveError::TeamMembers {
                        section_id: sel.section_id,
                        source,
                    })?;
                Some(sel.ids.len())
            }
            None => None,
        };

        self.store
            .touch_project(self.project_id)
            .await
            .map_err(|source| SaveError::Project {
                project_id: self.project_id,
                source,
            })?;

        Ok(SaveReport {
            sections: snapshot.sections.len(),
            case_studies,
            team_members,
            persisted: true,
        })
    }
}

fn ensure_edit_mode(state: &EditState) -> Result<(), CoreError> {
    if state.edit_mode {
        Ok(())
    } else {
        Err(CoreError::Conflict("Composer session is closed".to_string()))
    }
}

fn expect_type(section: &Section, expected: SectionType) -> Result<(), CoreError> {
    if section.section_type == expected.as_str() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Section {} is '{}', expected '{expected}'",
            section.id, section.section_type
        )))
    }
}

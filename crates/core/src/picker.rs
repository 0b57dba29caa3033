//! Selection rules for the library pickers (case studies, team members,
//! images, collage presets).
//!
//! A picker is a pure selection surface: it is seeded from the section's
//! current associations, edited locally, and either cancelled (no effect) or
//! confirmed (the ordered id list goes back to the caller, which persists it).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// At most this many case studies can be attached to one section.
pub const MAX_CASE_STUDIES: usize = 4;

/// Which library a picker draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerKind {
    CaseStudy,
    TeamMember,
    Image,
    CollagePreset,
}

impl PickerKind {
    /// Fixed selection cap for this picker. Images use a caller-supplied cap.
    pub fn default_max(self) -> Option<usize> {
        match self {
            PickerKind::CaseStudy => Some(MAX_CASE_STUDIES),
            PickerKind::CollagePreset => Some(1),
            PickerKind::TeamMember | PickerKind::Image => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PickerKind::CaseStudy => "case studies",
            PickerKind::TeamMember => "team members",
            PickerKind::Image => "images",
            PickerKind::CollagePreset => "collage presets",
        }
    }
}

/// Local, ordered multi-selection with an optional maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    kind: PickerKind,
    ids: Vec<DbId>,
    max: Option<usize>,
}

impl Selection {
    /// Seed a selection from the section's current associations.
    ///
    /// `max` falls back to the kind's fixed cap. Duplicates are dropped and,
    /// if the seed exceeds the cap, only the first entries are kept.
    pub fn seeded(kind: PickerKind, current: &[DbId], max: Option<usize>) -> Self {
        let max = max.or(kind.default_max());
        let mut selection = Self {
            kind,
            ids: Vec::with_capacity(current.len()),
            max,
        };
        for &id in current {
            if selection.is_full() {
                break;
            }
            if !selection.ids.contains(&id) {
                selection.ids.push(id);
            }
        }
        selection
    }

    /// Build a selection from an already-confirmed list, rejecting anything
    /// the picker itself would not have allowed.
    ///
    /// `max` falls back to the kind's fixed cap.
    pub fn from_confirmed(kind: PickerKind, ids: &[DbId], max: Option<usize>) -> Result<Self, CoreError> {
        let max = max.or(kind.default_max());
        if let Some(max) = max {
            if ids.len() > max {
                return Err(CoreError::Validation(format!(
                    "At most {max} {} can be selected, got {}",
                    kind.label(),
                    ids.len()
                )));
            }
        }
        let mut seen = Vec::with_capacity(ids.len());
        for &id in ids {
            if seen.contains(&id) {
                return Err(CoreError::Validation(format!(
                    "Duplicate id {id} in {} selection",
                    kind.label()
                )));
            }
            seen.push(id);
        }
        Ok(Self { kind, ids: seen, max })
    }

    pub fn ids(&self) -> &[DbId] {
        &self.ids
    }

    pub fn is_full(&self) -> bool {
        self.max.is_some_and(|max| self.ids.len() >= max)
    }

    /// Toggle `id`. Returns whether it is selected afterwards.
    ///
    /// Adding to a full selection is rejected and leaves it unchanged.
    pub fn toggle(&mut self, id: DbId) -> Result<bool, CoreError> {
        if let Some(pos) = self.ids.iter().position(|&x| x == id) {
            self.ids.remove(pos);
            return Ok(false);
        }
        if self.is_full() {
            return Err(CoreError::Validation(format!(
                "At most {} {} can be selected",
                self.max.unwrap_or_default(),
                self.kind.label()
            )));
        }
        self.ids.push(id);
        Ok(true)
    }

    /// Snapshot for the picker modal.
    pub fn state(&self) -> PickerState {
        PickerState {
            kind: self.kind,
            max: self.max,
            selected: self.ids.clone(),
            full: self.is_full(),
        }
    }

    /// Hand the ordered selection back to the caller.
    pub fn confirm(self) -> Vec<DbId> {
        self.ids
    }
}

/// Picker modal state as the client paints it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerState {
    pub kind: PickerKind,
    pub max: Option<usize>,
    pub selected: Vec<DbId>,
    /// Unselected entries are disabled.
    pub full: bool,
}

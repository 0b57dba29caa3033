//! Viewer engagement analytics.
//!
//! A viewer's page visit is one analytics session, keyed by a client-generated
//! session id. Section events accumulate dwell time and visibility-change
//! counts per section; the `end` event finalizes the session, after which
//! further events are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Single events reporting more dwell time than this are clamped.
pub const MAX_DWELL_MS_PER_EVENT: u64 = 60 * 60 * 1000;

/// Maximum length of a client-generated session id.
pub const MAX_SESSION_ID_LEN: usize = 128;

/// What an analytics session is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsScope {
    Project,
    Quote,
}

impl AnalyticsScope {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalyticsScope::Project => "project",
            AnalyticsScope::Quote => "quote",
        }
    }
}

/// Accumulated engagement for one section within one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionStats {
    pub dwell_ms: u64,
    pub visibility_changes: u32,
}

/// Per-section stats keyed by section identifier.
pub type SectionStatsMap = BTreeMap<String, SectionStats>;

/// An event reported by the public page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewerEvent {
    Start,
    Section {
        #[serde(rename = "sectionId")]
        section_id: String,
        #[serde(rename = "dwellMs", default)]
        dwell_ms: u64,
        #[serde(rename = "visibilityChanges", default)]
        visibility_changes: u32,
    },
    End {
        #[serde(rename = "durationMs", default)]
        duration_ms: Option<u64>,
    },
}

/// Validate a client-generated session id.
pub fn validate_session_id(session_id: &str) -> Result<(), CoreError> {
    if session_id.trim().is_empty() {
        return Err(CoreError::Validation("sessionId must not be empty".to_string()));
    }
    if session_id.len() > MAX_SESSION_ID_LEN {
        return Err(CoreError::Validation(format!(
            "sessionId too long: {} chars (max {MAX_SESSION_ID_LEN})",
            session_id.len()
        )));
    }
    Ok(())
}

/// In-memory state of one analytics session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub duration_ms: Option<u64>,
    pub sections: SectionStatsMap,
}

impl SessionState {
    pub fn new(started_at: Timestamp) -> Self {
        Self {
            started_at,
            ended_at: None,
            duration_ms: None,
            sections: SectionStatsMap::new(),
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Fold `event` into the session. Returns whether anything changed.
    pub fn apply(&mut self, event: &ViewerEvent, now: Timestamp) -> bool {
        if self.is_finalized() {
            return false;
        }
        match event {
            ViewerEvent::Start => false,
            ViewerEvent::Section {
                section_id,
                dwell_ms,
                visibility_changes,
            } => {
                let entry = self.sections.entry(section_id.clone()).or_default();
                entry.dwell_ms = entry
                    .dwell_ms
                    .saturating_add((*dwell_ms).min(MAX_DWELL_MS_PER_EVENT));
                entry.visibility_changes = entry.visibility_changes.saturating_add(*visibility_changes);
                true
            }
            ViewerEvent::End { duration_ms } => {
                let elapsed = (now - self.started_at).num_milliseconds().max(0) as u64;
                self.ended_at = Some(now);
                self.duration_ms = Some(duration_ms.unwrap_or(elapsed));
                true
            }
        }
    }
}

/// Totals for one section across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub section_id: String,
    pub sessions: u32,
    pub total_dwell_ms: u64,
    pub total_visibility_changes: u64,
}

/// Aggregated engagement for a project or quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    pub session_count: u32,
    pub finalized_count: u32,
    pub average_duration_ms: Option<u64>,
    pub sections: Vec<SectionSummary>,
}

/// Aggregate a set of sessions. Sections are sorted by total dwell, longest first.
pub fn summarize<'a>(sessions: impl IntoIterator<Item = &'a SessionState>) -> AnalyticsSummary {
    let mut session_count = 0u32;
    let mut finalized_count = 0u32;
    let mut duration_total = 0u64;
    let mut per_section: BTreeMap<&str, SectionSummary> = BTreeMap::new();

    for session in sessions {
        session_count += 1;
        if let Some(duration) = session.duration_ms {
            finalized_count += 1;
            duration_total = duration_total.saturating_add(duration);
        }
        for (section_id, stats) in &session.sections {
            let summary = per_section
                .entry(section_id.as_str())
                .or_insert_with(|| SectionSummary {
                    section_id: section_id.clone(),
                    sessions: 0,
                    total_dwell_ms: 0,
                    total_visibility_changes: 0,
                });
            summary.sessions += 1;
            summary.total_dwell_ms = summary.total_dwell_ms.saturating_add(stats.dwell_ms);
            summary.total_visibility_changes += u64::from(stats.visibility_changes);
        }
    }

    let mut sections: Vec<SectionSummary> = per_section.into_values().collect();
    sections.sort_by(|a, b| b.total_dwell_ms.cmp(&a.total_dwell_ms));

    AnalyticsSummary {
        session_count,
        finalized_count,
        average_duration_ms: (finalized_count > 0).then(|| duration_total / u64::from(finalized_count)),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn section(id: &str, dwell: u64, changes: u32) -> ViewerEvent {
        ViewerEvent::Section {
            section_id: id.to_string(),
            dwell_ms: dwell,
            visibility_changes: changes,
        }
    }

    #[test]
    fn section_events_accumulate() {
        let now = Utc::now();
        let mut state = SessionState::new(now);
        assert!(state.apply(&section("goal", 1500, 1), now));
        assert!(state.apply(&section("goal", 500, 2), now));
        assert!(state.apply(&section("team", 300, 0), now));

        assert_eq!(state.sections["goal"], SectionStats { dwell_ms: 2000, visibility_changes: 3 });
        assert_eq!(state.sections["team"].dwell_ms, 300);
    }

    #[test]
    fn oversized_dwell_is_clamped() {
        let now = Utc::now();
        let mut state = SessionState::new(now);
        state.apply(&section("goal", u64::MAX, 0), now);
        assert_eq!(state.sections["goal"].dwell_ms, MAX_DWELL_MS_PER_EVENT);
    }

    #[test]
    fn end_finalizes_and_freezes_session() {
        let start = Utc::now();
        let end = start + Duration::seconds(42);
        let mut state = SessionState::new(start);
        assert!(state.apply(&ViewerEvent::End { duration_ms: None }, end));
        assert_eq!(state.duration_ms, Some(42_000));
        assert!(state.is_finalized());

        assert!(!state.apply(&section("goal", 100, 1), end));
        assert!(state.sections.is_empty());
    }

    #[test]
    fn reported_duration_wins_over_elapsed() {
        let start = Utc::now();
        let mut state = SessionState::new(start);
        state.apply(&ViewerEvent::End { duration_ms: Some(1234) }, start + Duration::seconds(10));
        assert_eq!(state.duration_ms, Some(1234));
    }

    #[test]
    fn events_deserialize_from_client_shape() {
        let event: ViewerEvent = serde_json::from_value(serde_json::json!({
            "type": "section", "sectionId": "12", "dwellMs": 900, "visibilityChanges": 2
        }))
        .unwrap();
        assert_eq!(event, section("12", 900, 2));

        let event: ViewerEvent = serde_json::from_value(serde_json::json!({"type": "end"})).unwrap();
        assert_eq!(event, ViewerEvent::End { duration_ms: None });
    }

    #[test]
    fn summary_aggregates_sessions() {
        let now = Utc::now();
        let mut a = SessionState::new(now);
        a.apply(&section("goal", 1000, 1), now);
        a.apply(&section("concept", 4000, 0), now);
        a.apply(&ViewerEvent::End { duration_ms: Some(10_000) }, now);

        let mut b = SessionState::new(now);
        b.apply(&section("goal", 2000, 3), now);

        let summary = summarize([&a, &b]);
        assert_eq!(summary.session_count, 2);
        assert_eq!(summary.finalized_count, 1);
        assert_eq!(summary.average_duration_ms, Some(10_000));
        assert_eq!(summary.sections[0].section_id, "concept");
        let goal = summary.sections.iter().find(|s| s.section_id == "goal").unwrap();
        assert_eq!(goal.sessions, 2);
        assert_eq!(goal.total_dwell_ms, 3000);
        assert_eq!(goal.total_visibility_changes, 4);
    }

    #[test]
    fn empty_summary_has_no_average() {
        let summary = summarize(std::iter::empty());
        assert_eq!(summary.session_count, 0);
        assert_eq!(summary.average_duration_ms, None);
    }

    #[test]
    fn session_id_validation() {
        assert!(validate_session_id("abc-123").is_ok());
        assert!(validate_session_id("  ").is_err());
        assert!(validate_session_id(&"x".repeat(MAX_SESSION_ID_LEN + 1)).is_err());
    }
}

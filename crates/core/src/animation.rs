//! Scroll-progress math for the animated sections.
//!
//! Three sections animate with scroll: the goal text reveal, the four-phase
//! timeline and the concept background zoom. Each derives a progress value in
//! `0.0..=1.0` from where the tracked element sits in the viewport. Animation
//! is suspended in edit mode, where every frame is the static transform.

use serde::{Deserialize, Serialize};

use crate::content::TIMELINE_PHASES;

/// Viewports narrower than this never zoom the concept background.
pub const NARROW_VIEWPORT_PX: f64 = 768.0;

/// Progress reported while animation is suspended.
pub const NEUTRAL_PROGRESS: f64 = 0.0;

/// Vertical travel of the goal text before it settles, in pixels.
pub const GOAL_TRAVEL_PX: f64 = 40.0;

pub const CARD_SCALE_ACTIVE: f64 = 1.05;
pub const CARD_SCALE_INACTIVE: f64 = 0.95;
pub const CARD_BG_OPACITY_MIN: f64 = 0.15;
pub const CARD_BG_OPACITY_MAX: f64 = 1.0;

pub const CONCEPT_BASE_ZOOM: f64 = 1.0;
pub const CONCEPT_ZOOM_AMOUNT: f64 = 0.15;

/// Sections driven by scroll progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatedSection {
    Goal,
    Timeline,
    ConceptZoom,
}

impl AnimatedSection {
    pub const ALL: [AnimatedSection; 3] = [
        AnimatedSection::Goal,
        AnimatedSection::Timeline,
        AnimatedSection::ConceptZoom,
    ];

    fn slot(self) -> usize {
        match self {
            AnimatedSection::Goal => 0,
            AnimatedSection::Timeline => 1,
            AnimatedSection::ConceptZoom => 2,
        }
    }

    /// Viewport fractions at which progress starts and completes.
    pub fn window(self) -> ProgressWindow {
        match self {
            AnimatedSection::Goal => ProgressWindow { start: 0.85, end: 0.35 },
            AnimatedSection::Timeline => ProgressWindow { start: 0.7, end: -0.6 },
            AnimatedSection::ConceptZoom => ProgressWindow { start: 1.0, end: 0.0 },
        }
    }
}

/// Linear progress window expressed as fractions of the viewport height.
///
/// Progress is 0 while the element's top edge is below `start * height` and
/// reaches 1 once it has scrolled up to `end * height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressWindow {
    pub start: f64,
    pub end: f64,
}

impl ProgressWindow {
    /// Map the element's top edge (relative to the viewport) to progress.
    pub fn progress(self, element_top: f64, viewport_height: f64) -> f64 {
        let start_px = self.start * viewport_height;
        let end_px = self.end * viewport_height;
        let span = start_px - end_px;
        if viewport_height <= 0.0 || span <= 0.0 || !element_top.is_finite() {
            return NEUTRAL_PROGRESS;
        }
        ((start_px - element_top) / span).clamp(0.0, 1.0)
    }
}

/* --------------------------------------------------------------------------
   Frames
   -------------------------------------------------------------------------- */

/// Reveal transform for the goal text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalFrame {
    pub opacity: f64,
    pub translate_y_px: f64,
}

impl GoalFrame {
    pub const STATIC: GoalFrame = GoalFrame {
        opacity: 1.0,
        translate_y_px: 0.0,
    };

    pub fn at(progress: f64) -> Self {
        let p = progress.clamp(0.0, 1.0);
        GoalFrame {
            opacity: p,
            translate_y_px: (1.0 - p) * GOAL_TRAVEL_PX,
        }
    }
}

/// Visual state of one timeline card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFrame {
    pub active: bool,
    pub scale: f64,
    pub background_opacity: f64,
}

/// Visual state of the whole timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFrame {
    /// `None` while animation is suspended.
    pub active_index: Option<usize>,
    pub cards: Vec<CardFrame>,
}

impl TimelineFrame {
    pub fn static_frame() -> Self {
        TimelineFrame {
            active_index: None,
            cards: vec![
                CardFrame {
                    active: false,
                    scale: 1.0,
                    background_opacity: CARD_BG_OPACITY_MAX,
                };
                TIMELINE_PHASES
            ],
        }
    }

    pub fn at(progress: f64) -> Self {
        let active = active_card(progress);
        let cards = (0..TIMELINE_PHASES)
            .map(|i| {
                let fade = card_fade(progress, i);
                CardFrame {
                    active: i == active,
                    scale: if i == active {
                        CARD_SCALE_ACTIVE
                    } else {
                        CARD_SCALE_INACTIVE
                    },
                    background_opacity: CARD_BG_OPACITY_MIN
                        + (CARD_BG_OPACITY_MAX - CARD_BG_OPACITY_MIN) * fade,
                }
            })
            .collect();
        TimelineFrame {
            active_index: Some(active),
            cards,
        }
    }
}

/// Index of the highlighted timeline card: `floor(progress * 4)` capped at 3.
pub fn active_card(progress: f64) -> usize {
    let p = progress.clamp(0.0, 1.0);
    ((p * TIMELINE_PHASES as f64).floor() as usize).min(TIMELINE_PHASES - 1)
}

/// Secondary fade for card `index`: 1 at the centre of the card's own slice of
/// the progress range, falling linearly to 0 at its edges and beyond.
pub fn card_fade(progress: f64, index: usize) -> f64 {
    let local = progress.clamp(0.0, 1.0) * TIMELINE_PHASES as f64 - index as f64;
    let distance = (local - 0.5).abs();
    (1.0 - distance * 2.0).clamp(0.0, 1.0)
}

/// Background zoom of the concept section.
pub fn concept_zoom(progress: f64, viewport_width: f64) -> f64 {
    if viewport_width < NARROW_VIEWPORT_PX {
        return CONCEPT_BASE_ZOOM;
    }
    CONCEPT_BASE_ZOOM + CONCEPT_ZOOM_AMOUNT * progress.clamp(0.0, 1.0)
}

/// Frame of one animated section, tagged by section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum AnimationFrame {
    Goal(GoalFrame),
    Timeline(TimelineFrame),
    ConceptZoom { zoom: f64 },
}

/* --------------------------------------------------------------------------
   Animator
   -------------------------------------------------------------------------- */

/// Tracks progress for the animated sections of one page view.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    edit_mode: bool,
    progress: [f64; 3],
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ScrollAnimator {
    pub fn new(edit_mode: bool) -> Self {
        Self {
            edit_mode,
            progress: [NEUTRAL_PROGRESS; 3],
        }
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Entering edit mode snaps every section to the neutral value at once.
    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.edit_mode = edit_mode;
        if edit_mode {
            self.progress = [NEUTRAL_PROGRESS; 3];
        }
    }

    /// Recompute progress for `section` after a scroll or resize event.
    pub fn on_scroll(&mut self, section: AnimatedSection, element_top: f64, viewport_height: f64) -> f64 {
        if self.edit_mode {
            return NEUTRAL_PROGRESS;
        }
        let value = section.window().progress(element_top, viewport_height);
        self.progress[section.slot()] = value;
        value
    }

    pub fn progress(&self, section: AnimatedSection) -> f64 {
        self.progress[section.slot()]
    }

    pub fn goal_frame(&self) -> GoalFrame {
        if self.edit_mode {
            GoalFrame::STATIC
        } else {
            GoalFrame::at(self.progress(AnimatedSection::Goal))
        }
    }

    pub fn timeline_frame(&self) -> TimelineFrame {
        if self.edit_mode {
            TimelineFrame::static_frame()
        } else {
            TimelineFrame::at(self.progress(AnimatedSection::Timeline))
        }
    }

    pub fn concept_zoom(&self, viewport_width: f64) -> f64 {
        if self.edit_mode {
            CONCEPT_BASE_ZOOM
        } else {
            concept_zoom(self.progress(AnimatedSection::ConceptZoom), viewport_width)
        }
    }

    /// Current frame of `section`.
    pub fn frame(&self, section: AnimatedSection, viewport_width: f64) -> AnimationFrame {
        match section {
            AnimatedSection::Goal => AnimationFrame::Goal(self.goal_frame()),
            AnimatedSection::Timeline => AnimationFrame::Timeline(self.timeline_frame()),
            AnimatedSection::ConceptZoom => AnimationFrame::ConceptZoom {
                zoom: self.concept_zoom(viewport_width),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VH: f64 = 1000.0;

    #[test]
    fn progress_is_zero_before_start_threshold() {
        let window = AnimatedSection::Goal.window();
        assert_eq!(window.progress(900.0, VH), 0.0);
        assert_eq!(window.progress(5000.0, VH), 0.0);
    }

    #[test]
    fn progress_is_one_after_end_threshold() {
        let window = AnimatedSection::Goal.window();
        assert_eq!(window.progress(350.0, VH), 1.0);
        assert_eq!(window.progress(-2000.0, VH), 1.0);
    }

    #[test]
    fn progress_is_linear_between_thresholds() {
        let window = ProgressWindow { start: 1.0, end: 0.0 };
        assert!((window.progress(750.0, VH) - 0.25).abs() < 1e-9);
        assert!((window.progress(500.0, VH) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_geometry_is_neutral() {
        let window = AnimatedSection::Timeline.window();
        assert_eq!(window.progress(100.0, 0.0), NEUTRAL_PROGRESS);
        assert_eq!(window.progress(f64::NAN, VH), NEUTRAL_PROGRESS);
    }

    #[test]
    fn active_card_is_floor_of_progress_times_four() {
        assert_eq!(active_card(0.0), 0);
        assert_eq!(active_card(0.24), 0);
        assert_eq!(active_card(0.25), 1);
        assert_eq!(active_card(0.6), 2);
        assert_eq!(active_card(0.99), 3);
        assert_eq!(active_card(1.0), 3);
    }

    #[test]
    fn card_fade_peaks_at_window_centre() {
        assert!((card_fade(0.125, 0) - 1.0).abs() < 1e-9);
        assert_eq!(card_fade(0.0, 0), 0.0);
        assert_eq!(card_fade(0.25, 0), 0.0);
        assert!((card_fade(0.3125, 1) - 0.5).abs() < 1e-9);
        assert_eq!(card_fade(0.9, 0), 0.0);
    }

    #[test]
    fn fade_is_independent_of_active_state() {
        // Card 1 becomes active at 0.25 but its fade is still 0 there.
        let frame = TimelineFrame::at(0.25);
        assert!(frame.cards[1].active);
        assert_eq!(frame.cards[1].scale, CARD_SCALE_ACTIVE);
        assert_eq!(frame.cards[1].background_opacity, CARD_BG_OPACITY_MIN);
    }

    #[test]
    fn concept_zoom_interpolates_on_wide_viewports() {
        assert_eq!(concept_zoom(0.0, 1440.0), CONCEPT_BASE_ZOOM);
        assert!((concept_zoom(1.0, 1440.0) - (CONCEPT_BASE_ZOOM + CONCEPT_ZOOM_AMOUNT)).abs() < 1e-9);
    }

    #[test]
    fn concept_zoom_is_neutral_on_narrow_viewports() {
        assert_eq!(concept_zoom(1.0, 375.0), CONCEPT_BASE_ZOOM);
    }

    #[test]
    fn entering_edit_mode_snaps_to_neutral() {
        let mut animator = ScrollAnimator::default();
        animator.on_scroll(AnimatedSection::Goal, 100.0, VH);
        animator.on_scroll(AnimatedSection::Timeline, -200.0, VH);
        assert!(animator.progress(AnimatedSection::Goal) > 0.0);

        animator.set_edit_mode(true);
        for section in AnimatedSection::ALL {
            assert_eq!(animator.progress(section), NEUTRAL_PROGRESS);
        }
        assert_eq!(animator.goal_frame(), GoalFrame::STATIC);
        assert_eq!(animator.timeline_frame(), TimelineFrame::static_frame());
        assert_eq!(animator.concept_zoom(1440.0), CONCEPT_BASE_ZOOM);
    }

    #[test]
    fn scroll_events_are_ignored_in_edit_mode() {
        let mut animator = ScrollAnimator::new(true);
        assert_eq!(animator.on_scroll(AnimatedSection::Goal, 0.0, VH), NEUTRAL_PROGRESS);
        assert_eq!(animator.progress(AnimatedSection::Goal), NEUTRAL_PROGRESS);

        animator.set_edit_mode(false);
        assert_eq!(animator.on_scroll(AnimatedSection::Goal, 0.0, VH), 1.0);
    }

    #[test]
    fn frame_follows_tracked_progress() {
        let mut animator = ScrollAnimator::default();
        animator.on_scroll(AnimatedSection::Timeline, 600.0, VH);

        let AnimationFrame::Timeline(frame) = animator.frame(AnimatedSection::Timeline, 1440.0) else {
            panic!("expected a timeline frame");
        };
        assert_eq!(frame.active_index, Some(0));

        let zoom = animator.frame(AnimatedSection::ConceptZoom, 375.0);
        assert_eq!(zoom, AnimationFrame::ConceptZoom { zoom: CONCEPT_BASE_ZOOM });
    }

    #[test]
    fn frame_serializes_with_section_tag() {
        let json = serde_json::to_value(AnimationFrame::Goal(GoalFrame::STATIC)).unwrap();
        assert_eq!(json["section"], "goal");
        assert_eq!(json["opacity"], 1.0);
        assert_eq!(json["translateYPx"], 0.0);
    }
}

//! Section renderer (view / edit dual mode).
//!
//! Turns stored sections plus their resolved library entities into the view
//! model the page paints. One render arm per section type interprets the
//! content payload; in edit mode the view also lists the in-place editable
//! fields and the picker each section opens. Hidden sections are dropped in
//! view mode. A section whose type is unknown renders nothing and is logged;
//! it never fails the surrounding page.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::animation::{AnimatedSection, AnimationFrame, ProgressWindow, ScrollAnimator, NARROW_VIEWPORT_PX};
use crate::background::{background_style, BackgroundStyle, ImagePlacement};
use crate::content::{
    self, DeliverableItem, SectionContent, TimelineItem, COLLAGE_SLOTS, COLLAGE_SLOT_KEYS,
};
use crate::picker::{PickerKind, PickerState, Selection, MAX_CASE_STUDIES};
use crate::section_type::SectionType;
use crate::types::DbId;

/// Whether the page is rendered for a viewer or for an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    View,
    Edit,
}

impl RenderMode {
    pub fn is_edit(self) -> bool {
        matches!(self, RenderMode::Edit)
    }
}

/// A stored section as the renderer reads it.
#[derive(Debug, Clone, Copy)]
pub struct SectionInput<'a> {
    pub id: DbId,
    pub section_type: &'a str,
    pub content: &'a Value,
    pub visible: bool,
    pub order_index: i32,
}

/// A case study card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseCard {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
}

/// A team member card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamCard {
    pub id: DbId,
    pub name: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Library entities resolved for one section.
#[derive(Debug, Clone, Default)]
pub struct SectionResources {
    /// Case studies in display order.
    pub case_studies: Vec<CaseCard>,
    /// Team members in display order.
    pub team_members: Vec<TeamCard>,
    /// Images attached through `section_images`.
    pub images: Vec<ImagePlacement>,
    /// Public URLs for image ids referenced from content (collage slots).
    pub image_urls: HashMap<DbId, String>,
}

/// Grid placement of one collage cell on wide viewports.
///
/// On narrow viewports all five cells stack vertically in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollageArea {
    pub row: u8,
    pub column: u8,
    pub row_span: u8,
    pub column_span: u8,
    /// Drawn over its neighbours.
    pub overlap: bool,
}

/// Fixed five-cell layout: pos1 full-width top, pos2 tall left column
/// spanning two rows, pos3 overlapping top-right, pos4 bottom-right, pos5
/// full-width bottom.
pub const COLLAGE_LAYOUT: [CollageArea; COLLAGE_SLOTS] = [
    CollageArea { row: 1, column: 1, row_span: 1, column_span: 2, overlap: false },
    CollageArea { row: 2, column: 1, row_span: 2, column_span: 1, overlap: false },
    CollageArea { row: 2, column: 2, row_span: 1, column_span: 1, overlap: true },
    CollageArea { row: 3, column: 2, row_span: 1, column_span: 1, overlap: false },
    CollageArea { row: 4, column: 1, row_span: 1, column_span: 2, overlap: false },
];

/// One cell of the example-work collage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollageSlot {
    pub position: &'static str,
    pub area: CollageArea,
    pub image_id: Option<DbId>,
    pub image_url: Option<String>,
}

/// Per-type body of a rendered section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum SectionBody {
    Text {
        text: String,
        is_placeholder: bool,
    },
    Cases {
        description: Option<String>,
        cards: Vec<CaseCard>,
        /// Only set in edit mode when nothing is selected.
        empty_prompt: Option<&'static str>,
    },
    Timeline {
        description: String,
        phases: Vec<TimelineItem>,
    },
    Deliverables {
        text: String,
        items: Vec<DeliverableItem>,
    },
    ExampleWork {
        preset_id: Option<DbId>,
        slots: Vec<CollageSlot>,
    },
    Team {
        description: Option<String>,
        members: Vec<TeamCard>,
    },
    /// Pricing is rendered by the quote subsystem.
    Quote { project_id: Option<DbId> },
}

/// Animation wiring for sections driven by scroll progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationSpec {
    pub section: AnimatedSection,
    pub window: ProgressWindow,
    /// Edit mode: no scroll tracking, `frame` is the static transform.
    pub suspended: bool,
    /// Frame before any scroll event.
    pub frame: AnimationFrame,
}

/// Edit-mode affordances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditAffordances {
    /// Content keys editable in place; committed on focus loss.
    pub fields: Vec<&'static str>,
    /// Picker seeded from the current associations.
    pub picker: Option<PickerState>,
    /// Deliverable cards can be added and removed.
    pub can_add_items: bool,
}

/// A rendered section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub id: DbId,
    pub section_type: String,
    pub title: String,
    pub visible: bool,
    pub order_index: i32,
    pub background: BackgroundStyle,
    /// `None` for sections that do not animate.
    pub animation: Option<AnimationSpec>,
    /// `None` in view mode.
    pub edit: Option<EditAffordances>,
    pub body: SectionBody,
}

const CASES_EMPTY_PROMPT: &str = "Velg case-studier som skal vises i denne seksjonen.";

/// Render one section, or `None` if it must not be shown.
pub fn render_section(
    section: SectionInput<'_>,
    resources: &SectionResources,
    mode: RenderMode,
    project_id: Option<DbId>,
) -> Option<SectionView> {
    if !section.visible && !mode.is_edit() {
        return None;
    }

    let section_type: SectionType = match section.section_type.parse() {
        Ok(t) => t,
        Err(_) => {
            tracing::warn!(
                section_id = section.id,
                section_type = section.section_type,
                "Skipping section with unknown type"
            );
            return None;
        }
    };

    let body = render_body(section_type, section.content, resources, mode, project_id);

    let animation = animated_section(section_type).map(|s| {
        let animator = ScrollAnimator::new(mode.is_edit());
        AnimationSpec {
            section: s,
            window: s.window(),
            suspended: animator.edit_mode(),
            // Progress starts at zero, where zoom does not depend on width.
            frame: animator.frame(s, NARROW_VIEWPORT_PX),
        }
    });

    let edit = mode.is_edit().then(|| EditAffordances {
        fields: content::legal_keys(section_type).to_vec(),
        picker: picker_for(section_type).map(|kind| {
            let current = current_ids(kind, section.content, resources);
            Selection::seeded(kind, &current, None).state()
        }),
        can_add_items: section_type == SectionType::Deliverables,
    });

    Some(SectionView {
        id: section.id,
        section_type: section.section_type.to_string(),
        title: section_type.title().to_string(),
        visible: section.visible,
        order_index: section.order_index,
        background: background_style(&resources.images, 0),
        animation,
        edit,
        body,
    })
}

/// Render an ordered page. Sections are sorted by `order_index`.
pub fn render_page(
    sections: &[SectionInput<'_>],
    resources: &HashMap<DbId, SectionResources>,
    mode: RenderMode,
    project_id: Option<DbId>,
) -> Vec<SectionView> {
    let empty = SectionResources::default();
    let mut ordered: Vec<&SectionInput<'_>> = sections.iter().collect();
    ordered.sort_by_key(|s| s.order_index);
    ordered
        .into_iter()
        .filter_map(|s| {
            let res = resources.get(&s.id).unwrap_or(&empty);
            render_section(*s, res, mode, project_id)
        })
        .collect()
}

fn render_body(
    section_type: SectionType,
    raw: &Value,
    resources: &SectionResources,
    mode: RenderMode,
    project_id: Option<DbId>,
) -> SectionBody {
    match SectionContent::from_raw(section_type, raw) {
        SectionContent::Text { text } => SectionBody::Text {
            text,
            is_placeholder: !content::has_text(raw, "text"),
        },
        SectionContent::Cases { description } => {
            let cards: Vec<CaseCard> = resources
                .case_studies
                .iter()
                .take(MAX_CASE_STUDIES)
                .cloned()
                .collect();
            let empty_prompt = (mode.is_edit() && cards.is_empty()).then_some(CASES_EMPTY_PROMPT);
            SectionBody::Cases {
                description,
                cards,
                empty_prompt,
            }
        }
        SectionContent::Timeline { description, items } => SectionBody::Timeline {
            description,
            phases: items,
        },
        SectionContent::Deliverables { text, items } => SectionBody::Deliverables { text, items },
        SectionContent::ExampleWork { preset_id, slots } => SectionBody::ExampleWork {
            preset_id,
            slots: COLLAGE_SLOT_KEYS
                .iter()
                .zip(COLLAGE_LAYOUT)
                .zip(slots)
                .map(|((&position, area), image_id)| CollageSlot {
                    position,
                    area,
                    image_id,
                    image_url: image_id.and_then(|id| resources.image_urls.get(&id).cloned()),
                })
                .collect(),
        },
        SectionContent::Team { description } => SectionBody::Team {
            description,
            members: resources.team_members.clone(),
        },
        SectionContent::Quote => SectionBody::Quote { project_id },
    }
}

fn animated_section(section_type: SectionType) -> Option<AnimatedSection> {
    match section_type {
        SectionType::Goal => Some(AnimatedSection::Goal),
        SectionType::Timeline => Some(AnimatedSection::Timeline),
        SectionType::Concept => Some(AnimatedSection::ConceptZoom),
        _ => None,
    }
}

fn picker_for(section_type: SectionType) -> Option<PickerKind> {
    match section_type {
        SectionType::Cases => Some(PickerKind::CaseStudy),
        SectionType::Team => Some(PickerKind::TeamMember),
        SectionType::ExampleWork => Some(PickerKind::CollagePreset),
        SectionType::Moodboard | SectionType::Hero | SectionType::Concept => Some(PickerKind::Image),
        _ => None,
    }
}

fn current_ids(kind: PickerKind, raw: &Value, resources: &SectionResources) -> Vec<DbId> {
    match kind {
        PickerKind::CaseStudy => resources.case_studies.iter().map(|c| c.id).collect(),
        PickerKind::TeamMember => resources.team_members.iter().map(|m| m.id).collect(),
        PickerKind::Image => resources.images.iter().map(|i| i.image_id).collect(),
        PickerKind::CollagePreset => content::id_field(raw, "presetId").into_iter().collect(),
    }
}

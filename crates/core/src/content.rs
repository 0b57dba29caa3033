//! Section content model.
//!
//! A section's `content` column is a free-form JSON object whose legal keys are
//! fixed by the section type. Storage keeps the raw object so that a partial
//! update never disturbs keys this crate does not know about; readers go
//! through [`SectionContent::from_raw`], which is total: missing, empty or
//! malformed values fall back to the per-type placeholder instead of failing.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::section_type::SectionType;
use crate::types::DbId;

/// Number of phase cards on the timeline section.
pub const TIMELINE_PHASES: usize = 4;

/// Number of image slots in the example-work collage.
pub const COLLAGE_SLOTS: usize = 5;

/// JSON keys of the collage slots, in layout order.
pub const COLLAGE_SLOT_KEYS: [&str; COLLAGE_SLOTS] = ["pos1", "pos2", "pos3", "pos4", "pos5"];

/* --------------------------------------------------------------------------
   Default copy
   -------------------------------------------------------------------------- */

pub const HERO_PLACEHOLDER: &str = "Skriv en kort introduksjon til prosjektet.";
pub const GOAL_PLACEHOLDER: &str = "Beskriv hva prosjektet skal oppnå.";
pub const CONCEPT_PLACEHOLDER: &str = "Beskriv konseptet og den kreative retningen.";
pub const MOODBOARD_PLACEHOLDER: &str = "Stemning, farger og referanser for prosjektet.";
pub const CONTACT_PLACEHOLDER: &str = "Ta kontakt for en uforpliktende prat om prosjektet.";
pub const TIMELINE_PLACEHOLDER: &str = "Slik jobber vi fra idé til ferdig produksjon.";
pub const DELIVERABLES_PLACEHOLDER: &str = "Dette leverer vi i prosjektet.";
pub const DELIVERABLE_TITLE_PLACEHOLDER: &str = "Ny leveranse";
pub const DELIVERABLE_FORMAT_DEFAULT: &str = "16:9";

/// Built-in timeline phases as `(title, text)`.
pub const DEFAULT_TIMELINE: [(&str, &str); TIMELINE_PHASES] = [
    (
        "Planlegging",
        "Vi kartlegger mål, målgruppe og budskap, og legger en plan for produksjonen.",
    ),
    (
        "Forproduksjon",
        "Manus, storyboard, lokasjoner og casting kommer på plass før opptak.",
    ),
    (
        "Produksjon",
        "Opptaksdagene gjennomføres med et erfarent team og riktig utstyr.",
    ),
    (
        "Etterarbeid",
        "Klipp, fargekorrigering, lyd og grafikk ferdigstiller leveransene.",
    ),
];

/* --------------------------------------------------------------------------
   Raw map helpers
   -------------------------------------------------------------------------- */

/// Keys each section type reads from its content map.
pub fn legal_keys(section_type: SectionType) -> &'static [&'static str] {
    match section_type {
        SectionType::Hero
        | SectionType::Goal
        | SectionType::Concept
        | SectionType::Moodboard
        | SectionType::Contact => &["text"],
        SectionType::Cases | SectionType::Team => &["description"],
        SectionType::Timeline => &["description", "timelineItems"],
        SectionType::Deliverables => &["text", "deliverableItems"],
        SectionType::ExampleWork => &["presetId", "pos1", "pos2", "pos3", "pos4", "pos5"],
        SectionType::Quote => &[],
    }
}

/// Return a new content object with `key` set to `value`.
///
/// Every other key of `content` is carried over untouched. A non-object
/// `content` is treated as an empty object.
pub fn merge_key(content: &Value, key: &str, value: Value) -> Value {
    let mut map = match content {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Read a non-blank string field.
fn text_field<'a>(content: &'a Value, key: &str) -> Option<&'a str> {
    content
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Whether `key` holds non-blank text (as opposed to falling back to a placeholder).
pub fn has_text(content: &Value, key: &str) -> bool {
    text_field(content, key).is_some()
}

fn text_or(content: &Value, key: &str, placeholder: &str) -> String {
    text_field(content, key).unwrap_or(placeholder).to_string()
}

/// Read an id stored either as a JSON number or a numeric string.
pub(crate) fn id_field(content: &Value, key: &str) -> Option<DbId> {
    match content.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/* --------------------------------------------------------------------------
   Typed views
   -------------------------------------------------------------------------- */

/// One phase card on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineItem {
    pub title: String,
    pub text: String,
}

/// One card in the deliverables grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliverableItem {
    pub title: String,
    pub quantity: u32,
    /// Format or aspect ratio, e.g. `16:9`.
    pub format: String,
    pub description: Option<String>,
}

impl DeliverableItem {
    fn from_raw(raw: &Value) -> Self {
        let quantity = match raw.get("quantity") {
            Some(Value::Number(n)) => n.as_u64().and_then(|q| u32::try_from(q).ok()),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        Self {
            title: text_or(raw, "title", DELIVERABLE_TITLE_PLACEHOLDER),
            quantity: quantity.unwrap_or(1),
            format: text_or(raw, "format", DELIVERABLE_FORMAT_DEFAULT),
            description: text_field(raw, "description").map(str::to_string),
        }
    }
}

/// Typed interpretation of a section's content map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionContent {
    /// Single text block (hero, goal, concept, moodboard, contact).
    Text { text: String },
    Cases { description: Option<String> },
    Timeline {
        description: String,
        items: Vec<TimelineItem>,
    },
    Deliverables {
        text: String,
        items: Vec<DeliverableItem>,
    },
    ExampleWork {
        preset_id: Option<DbId>,
        slots: [Option<DbId>; COLLAGE_SLOTS],
    },
    Team { description: Option<String> },
    Quote,
}

impl SectionContent {
    /// Interpret `content` for `section_type`, filling placeholders.
    pub fn from_raw(section_type: SectionType, content: &Value) -> Self {
        match section_type {
            SectionType::Hero => Self::text(content, HERO_PLACEHOLDER),
            SectionType::Goal => Self::text(content, GOAL_PLACEHOLDER),
            SectionType::Concept => Self::text(content, CONCEPT_PLACEHOLDER),
            SectionType::Moodboard => Self::text(content, MOODBOARD_PLACEHOLDER),
            SectionType::Contact => Self::text(content, CONTACT_PLACEHOLDER),
            SectionType::Cases => SectionContent::Cases {
                description: text_field(content, "description").map(str::to_string),
            },
            SectionType::Team => SectionContent::Team {
                description: text_field(content, "description").map(str::to_string),
            },
            SectionType::Timeline => SectionContent::Timeline {
                description: text_or(content, "description", TIMELINE_PLACEHOLDER),
                items: timeline_items(content),
            },
            SectionType::Deliverables => SectionContent::Deliverables {
                text: text_or(content, "text", DELIVERABLES_PLACEHOLDER),
                items: content
                    .get("deliverableItems")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().map(DeliverableItem::from_raw).collect())
                    .unwrap_or_default(),
            },
            SectionType::ExampleWork => SectionContent::ExampleWork {
                preset_id: id_field(content, "presetId"),
                slots: collage_slots(content),
            },
            SectionType::Quote => SectionContent::Quote,
        }
    }

    fn text(content: &Value, placeholder: &str) -> Self {
        SectionContent::Text {
            text: text_or(content, "text", placeholder),
        }
    }
}

/// Resolve the four timeline phases, falling back per field to the defaults.
pub fn timeline_items(content: &Value) -> Vec<TimelineItem> {
    let stored = content.get("timelineItems").and_then(Value::as_array);
    DEFAULT_TIMELINE
        .iter()
        .enumerate()
        .map(|(i, (default_title, default_text))| {
            let raw = stored.and_then(|items| items.get(i)).unwrap_or(&Value::Null);
            TimelineItem {
                title: text_or(raw, "title", default_title),
                text: text_or(raw, "text", default_text),
            }
        })
        .collect()
}

/// Resolve the five collage slots (`pos1..pos5`) to image ids.
pub fn collage_slots(content: &Value) -> [Option<DbId>; COLLAGE_SLOTS] {
    COLLAGE_SLOT_KEYS.map(|key| id_field(content, key))
}

/* --------------------------------------------------------------------------
   Structured edits
   -------------------------------------------------------------------------- */

/// Replace one timeline phase, materialising the full four-phase array.
///
/// Phases that were never stored are written out with their defaults so the
/// stored array always has [`TIMELINE_PHASES`] entries after the first edit.
pub fn with_timeline_item(content: &Value, index: usize, title: &str, text: &str) -> Option<Value> {
    if index >= TIMELINE_PHASES {
        return None;
    }
    let mut items: Vec<Value> = timeline_items(content)
        .into_iter()
        .map(|item| serde_json::json!({ "title": item.title, "text": item.text }))
        .collect();
    // Keep any extra keys the stored phase object carried.
    let mut phase = content
        .get("timelineItems")
        .and_then(|items| items.get(index))
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    phase = merge_key(&phase, "title", Value::String(title.to_string()));
    phase = merge_key(&phase, "text", Value::String(text.to_string()));
    items[index] = phase;
    Some(merge_key(content, "timelineItems", Value::Array(items)))
}

/// Append a blank deliverable card.
pub fn with_deliverable_added(content: &Value) -> Value {
    let mut items = content
        .get("deliverableItems")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    items.push(serde_json::json!({
        "title": DELIVERABLE_TITLE_PLACEHOLDER,
        "quantity": 1,
        "format": DELIVERABLE_FORMAT_DEFAULT,
    }));
    merge_key(content, "deliverableItems", Value::Array(items))
}

/// Remove the deliverable card at `index`. Returns `None` if out of range.
pub fn with_deliverable_removed(content: &Value, index: usize) -> Option<Value> {
    let mut items = content
        .get("deliverableItems")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if index >= items.len() {
        return None;
    }
    items.remove(index);
    Some(merge_key(content, "deliverableItems", Value::Array(items)))
}

/// Copy a collage preset's five image slots into an example-work section.
pub fn with_collage_preset(
    content: &Value,
    preset_id: DbId,
    slots: [DbId; COLLAGE_SLOTS],
) -> Value {
    let mut out = merge_key(content, "presetId", Value::from(preset_id));
    for (key, image_id) in COLLAGE_SLOT_KEYS.iter().zip(slots) {
        out = merge_key(&out, key, Value::from(image_id));
    }
    out
}

//! The closed set of section types a pitch page is composed from.
//!
//! Section types are stored as plain strings in the `sections.type` column so
//! that rows written by older clients still load. Parsing is therefore
//! fallible: callers that meet an unknown type skip the section and log it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Every section type a project page can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Hero,
    Goal,
    Concept,
    Cases,
    Moodboard,
    Timeline,
    Deliverables,
    Contact,
    Team,
    ExampleWork,
    Quote,
}

impl SectionType {
    /// All section types in their canonical declaration order.
    pub const ALL: [SectionType; 11] = [
        SectionType::Hero,
        SectionType::Goal,
        SectionType::Concept,
        SectionType::Cases,
        SectionType::Moodboard,
        SectionType::Timeline,
        SectionType::Deliverables,
        SectionType::Contact,
        SectionType::Team,
        SectionType::ExampleWork,
        SectionType::Quote,
    ];

    /// The section list a freshly created project is scaffolded with.
    pub const SCAFFOLD: [SectionType; 9] = [
        SectionType::Hero,
        SectionType::Goal,
        SectionType::Concept,
        SectionType::Cases,
        SectionType::Timeline,
        SectionType::Deliverables,
        SectionType::ExampleWork,
        SectionType::Team,
        SectionType::Contact,
    ];

    /// The database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionType::Hero => "hero",
            SectionType::Goal => "goal",
            SectionType::Concept => "concept",
            SectionType::Cases => "cases",
            SectionType::Moodboard => "moodboard",
            SectionType::Timeline => "timeline",
            SectionType::Deliverables => "deliverables",
            SectionType::Contact => "contact",
            SectionType::Team => "team",
            SectionType::ExampleWork => "example_work",
            SectionType::Quote => "quote",
        }
    }

    /// Whether a project may hold more than one section of this type.
    pub fn allows_multiple(self) -> bool {
        !matches!(self, SectionType::Quote)
    }

    /// Display title shown above the section.
    pub fn title(self) -> &'static str {
        default_title(self.as_str())
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown section type '{s}'")))
    }
}

/// Map a raw section type string to its display title.
///
/// Types outside the table display their raw type string.
pub fn default_title(section_type: &str) -> &str {
    match section_type {
        "goal" => "Mål",
        "concept" => "Konsept",
        "cases" => "Tidligere arbeid",
        "moodboard" => "Moodboard",
        "timeline" => "Tidslinje",
        "deliverables" => "Leveranser",
        "contact" => "Kontakt",
        other => other,
    }
}

/// Check that a new section of `new_type` may be added next to `existing`.
///
/// At most one `quote` section may exist per project.
pub fn validate_can_add(
    existing: impl IntoIterator<Item = SectionType>,
    new_type: SectionType,
) -> Result<(), CoreError> {
    if new_type.allows_multiple() {
        return Ok(());
    }
    if existing.into_iter().any(|t| t == new_type) {
        return Err(CoreError::Conflict(format!(
            "Project already has a '{new_type}' section"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_type() {
        for t in SectionType::ALL {
            assert_eq!(t.as_str().parse::<SectionType>().unwrap(), t);
        }
    }

    #[test]
    fn parse_rejects_unknown_type() {
        assert!("gallery".parse::<SectionType>().is_err());
        assert!("".parse::<SectionType>().is_err());
    }

    #[test]
    fn default_titles_follow_table() {
        assert_eq!(default_title("goal"), "Mål");
        assert_eq!(default_title("concept"), "Konsept");
        assert_eq!(default_title("cases"), "Tidligere arbeid");
        assert_eq!(default_title("deliverables"), "Leveranser");
        assert_eq!(default_title("contact"), "Kontakt");
    }

    #[test]
    fn types_outside_table_show_raw_string() {
        assert_eq!(default_title("hero"), "hero");
        assert_eq!(SectionType::ExampleWork.title(), "example_work");
    }

    #[test]
    fn second_quote_is_rejected() {
        let existing = [SectionType::Goal, SectionType::Quote];
        assert!(validate_can_add(existing, SectionType::Quote).is_err());
        assert!(validate_can_add(existing, SectionType::Goal).is_ok());
        assert!(validate_can_add([SectionType::Goal], SectionType::Quote).is_ok());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&SectionType::ExampleWork).unwrap();
        assert_eq!(json, "\"example_work\"");
    }
}

//! Image library model and DTOs.

use pitch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An image row from the `images` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    /// Path inside the storage bucket.
    pub file_path: String,
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Image {
    /// Whether this image passes the picker filter.
    ///
    /// `search` matches case-insensitively on the title or any tag;
    /// `category` must match exactly.
    pub fn matches(&self, filter: &ImageFilter) -> bool {
        if let Some(category) = filter.category.as_deref() {
            if self.category.as_deref() != Some(category) {
                return false;
            }
        }
        match filter.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                self.title
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&term))
                    || self.tags.iter().any(|t| t.to_lowercase().contains(&term))
            }
        }
    }
}

/// Image picker filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// DTO for registering an uploaded image.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateImage {
    #[validate(length(min = 1, max = 1024))]
    pub file_path: String,
    pub title: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(range(min = 1))]
    pub width: Option<i32>,
    #[validate(range(min = 1))]
    pub height: Option<i32>,
}

/// DTO for updating image metadata. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateImage {
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn image(title: Option<&str>, category: Option<&str>, tags: &[&str]) -> Image {
        Image {
            id: 1,
            file_path: "a.jpg".into(),
            title: title.map(String::from),
            category: category.map(String::from),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            width: None,
            height: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(image(None, None, &[]).matches(&ImageFilter::default()));
    }

    #[test]
    fn search_matches_title_or_tags_case_insensitively() {
        let img = image(Some("Fjord at dawn"), None, &["Natur"]);
        let by_title = ImageFilter { search: Some("FJORD".into()), category: None };
        let by_tag = ImageFilter { search: Some("natur".into()), category: None };
        let miss = ImageFilter { search: Some("city".into()), category: None };
        assert!(img.matches(&by_title));
        assert!(img.matches(&by_tag));
        assert!(!img.matches(&miss));
    }

    #[test]
    fn category_must_match_exactly() {
        let img = image(None, Some("drone"), &[]);
        let hit = ImageFilter { search: None, category: Some("drone".into()) };
        let miss = ImageFilter { search: None, category: Some("studio".into()) };
        assert!(img.matches(&hit));
        assert!(!img.matches(&miss));
    }
}

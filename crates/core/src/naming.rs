//! Slug generation for project URLs.

use std::sync::LazyLock;

use regex::Regex;

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("valid slug regex"));

/// Maximum slug length in bytes.
pub const MAX_SLUG_LEN: usize = 80;

/// Derive a URL slug from a project title.
///
/// Lowercases, transliterates Norwegian letters (`æ`→`ae`, `ø`→`o`,
/// `å`→`a`), collapses every other run of non-alphanumerics into a single
/// `-`, and trims dashes from both ends. Falls back to `"prosjekt"` when
/// nothing usable remains.
///
/// # Examples
///
/// ```
/// use pitch_core::naming::slugify;
///
/// assert_eq!(slugify("Sommerkampanje 2025"), "sommerkampanje-2025");
/// assert_eq!(slugify("Blåbær & Grøt"), "blabaer-grot");
/// ```
pub fn slugify(title: &str) -> String {
    let lowered: String = title
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'æ' => "ae".to_string(),
            'ø' => "o".to_string(),
            'å' => "a".to_string(),
            'é' | 'è' | 'ê' => "e".to_string(),
            other => other.to_string(),
        })
        .collect();

    let mut slug = NON_ALNUM
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string();

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        slug = slug.trim_end_matches('-').to_string();
    }

    if slug.is_empty() {
        "prosjekt".to_string()
    } else {
        slug
    }
}

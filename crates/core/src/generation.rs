//! Prompt policy for AI-assisted section copy.
//!
//! Generation is seeded with curated example texts for the same
//! `(section_type, project_type)` pair, ranked by editorial quality score.
//! This module holds the request validation, ranking, per-section length and
//! tone policy, prompt assembly and output clean-up. The HTTP call itself
//! lives in `pitch-composer`.

use serde::Deserialize;

use crate::error::CoreError;

/// At most this many examples are sent as context.
pub const MAX_EXAMPLES: usize = 5;

/// Quality scores are editorial rankings on a 1-10 scale.
pub const MIN_QUALITY_SCORE: i16 = 1;
pub const MAX_QUALITY_SCORE: i16 = 10;

/// Quote characters stripped from both ends of generated text.
const QUOTE_CHARS: &[char] = &['"', '\'', '«', '»', '“', '”', '„', '‘', '’'];

/// Raw generation request as received from the editor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub project_type: Option<String>,
    pub medium: Option<String>,
    pub target_audience: Option<String>,
    pub section_type: Option<String>,
}

/// A request with every parameter present and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub project_type: String,
    pub medium: String,
    pub target_audience: String,
    pub section_type: String,
}

impl GenerationRequest {
    /// Reject the request if any parameter is missing or blank.
    ///
    /// Runs before any storage or network call.
    pub fn validate(&self) -> Result<ValidatedRequest, CoreError> {
        fn required(value: &Option<String>, name: &str) -> Result<String, CoreError> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| CoreError::Validation(format!("Missing required parameter: {name}")))
        }

        Ok(ValidatedRequest {
            project_type: required(&self.project_type, "projectType")?,
            medium: required(&self.medium, "medium")?,
            target_audience: required(&self.target_audience, "targetAudience")?,
            section_type: required(&self.section_type, "sectionType")?,
        })
    }
}

/// Validate an example's quality score.
pub fn validate_quality_score(score: i16) -> Result<(), CoreError> {
    if !(MIN_QUALITY_SCORE..=MAX_QUALITY_SCORE).contains(&score) {
        return Err(CoreError::Validation(format!(
            "Quality score must be between {MIN_QUALITY_SCORE} and {MAX_QUALITY_SCORE}, got {score}"
        )));
    }
    Ok(())
}

/// Keep the best [`MAX_EXAMPLES`] items, highest score first.
///
/// The sort is stable so equal scores keep their incoming order.
pub fn top_examples<T>(mut examples: Vec<T>, score: impl Fn(&T) -> i16) -> Vec<T> {
    examples.sort_by_key(|e| std::cmp::Reverse(score(e)));
    examples.truncate(MAX_EXAMPLES);
    examples
}

/* --------------------------------------------------------------------------
   Section policy
   -------------------------------------------------------------------------- */

/// Target length and tone for one section type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionPolicy {
    pub min_words: u32,
    pub max_words: u32,
    pub tone: &'static str,
    pub max_tokens: u32,
}

/// Length and tone policy for `section_type`.
pub fn policy_for(section_type: &str) -> SectionPolicy {
    match section_type {
        "goal" => SectionPolicy {
            min_words: 50,
            max_words: 80,
            tone: "kort, tydelig og målrettet",
            max_tokens: 250,
        },
        "concept" => SectionPolicy {
            min_words: 100,
            max_words: 150,
            tone: "beskrivende og visuell",
            max_tokens: 450,
        },
        _ => SectionPolicy {
            min_words: 60,
            max_words: 120,
            tone: "profesjonell og engasjerende",
            max_tokens: 350,
        },
    }
}

/// System and user messages sent to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Assemble the prompt from the request and its ranked examples.
pub fn build_prompt(request: &ValidatedRequest, examples: &[&str]) -> Prompt {
    let policy = policy_for(&request.section_type);

    let system = format!(
        "Du er en erfaren tekstforfatter for et produksjonsselskap for video og foto. \
         Du skriver på norsk. Teksten skal være {tone}, mellom {min} og {max} ord, \
         og skal ikke omsluttes av anførselstegn.",
        tone = policy.tone,
        min = policy.min_words,
        max = policy.max_words,
    );

    let mut user = format!(
        "Skriv teksten til seksjonen «{section}» i et pitchdokument.\n\
         Prosjekttype: {project_type}\n\
         Medium: {medium}\n\
         Målgruppe: {audience}\n\n\
         Her er eksempler på gode tekster for samme type seksjon og prosjekt:\n",
        section = request.section_type,
        project_type = request.project_type,
        medium = request.medium,
        audience = request.target_audience,
    );
    for (i, example) in examples.iter().enumerate() {
        user.push_str(&format!("\nEksempel {}:\n{}\n", i + 1, example.trim()));
    }

    Prompt {
        system,
        user,
        max_tokens: policy.max_tokens,
    }
}

/// Trim whitespace and any ASCII or Norwegian quote marks from both ends.
pub fn strip_quotes(text: &str) -> String {
    text.trim()
        .trim_matches(|c: char| QUOTE_CHARS.contains(&c))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> GenerationRequest {
        GenerationRequest {
            project_type: Some("reklamefilm".into()),
            medium: Some("video".into()),
            target_audience: Some("unge voksne".into()),
            section_type: Some("goal".into()),
        }
    }

    #[test]
    fn complete_request_validates() {
        let validated = full_request().validate().unwrap();
        assert_eq!(validated.section_type, "goal");
    }

    #[test]
    fn each_missing_parameter_is_rejected() {
        let mut r = full_request();
        r.project_type = None;
        assert!(r.validate().unwrap_err().to_string().contains("projectType"));

        let mut r = full_request();
        r.medium = Some("   ".into());
        assert!(r.validate().unwrap_err().to_string().contains("medium"));

        let mut r = full_request();
        r.target_audience = None;
        assert!(r.validate().unwrap_err().to_string().contains("targetAudience"));

        let mut r = full_request();
        r.section_type = Some(String::new());
        assert!(r.validate().unwrap_err().to_string().contains("sectionType"));
    }

    #[test]
    fn top_examples_ranks_by_score_and_caps_at_five() {
        let examples = vec![("a", 3), ("b", 9), ("c", 7), ("d", 9), ("e", 1), ("f", 10), ("g", 5)];
        let top = top_examples(examples, |e| e.1);
        let names: Vec<&str> = top.iter().map(|e| e.0).collect();
        assert_eq!(names, vec!["f", "b", "d", "c", "g"]);
    }

    #[test]
    fn policies_differ_by_section() {
        let goal = policy_for("goal");
        assert_eq!((goal.min_words, goal.max_words), (50, 80));
        let concept = policy_for("concept");
        assert_eq!((concept.min_words, concept.max_words), (100, 150));
        assert!(concept.max_tokens > goal.max_tokens);
    }

    #[test]
    fn prompt_includes_parameters_and_examples() {
        let request = full_request().validate().unwrap();
        let prompt = build_prompt(&request, &["Første eksempel", "Andre eksempel"]);
        assert!(prompt.system.contains("mellom 50 og 80 ord"));
        assert!(prompt.user.contains("reklamefilm"));
        assert!(prompt.user.contains("unge voksne"));
        assert!(prompt.user.contains("Eksempel 2:\nAndre eksempel"));
    }

    #[test]
    fn strip_quotes_handles_ascii_and_norwegian_quotes() {
        assert_eq!(strip_quotes("\"Hei\""), "Hei");
        assert_eq!(strip_quotes("  «Hei på deg»  "), "Hei på deg");
        assert_eq!(strip_quotes("'Hei'"), "Hei");
        assert_eq!(strip_quotes("„Hei“"), "Hei");
        assert_eq!(strip_quotes("Uten anførsel"), "Uten anførsel");
    }

    #[test]
    fn strip_quotes_keeps_inner_quotes() {
        assert_eq!(strip_quotes("«Vi sa «hei» til alle»"), "Vi sa «hei» til alle");
    }

    #[test]
    fn quality_score_bounds() {
        assert!(validate_quality_score(1).is_ok());
        assert!(validate_quality_score(10).is_ok());
        assert!(validate_quality_score(0).is_err());
        assert!(validate_quality_score(11).is_err());
    }
}

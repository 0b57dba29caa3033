//! AI text generation bridge.
//!
//! Flow: validate the four parameters, fetch the best curated examples for
//! `(section_type, project_type)`, build the prompt, call the completion
//! endpoint, strip quote marks from the answer. Validation and the
//! "no examples" check both happen before anything is sent upstream.

use std::sync::Arc;

use async_trait::async_trait;
use pitch_core::content::legal_keys;
use pitch_core::error::CoreError;
use pitch_core::generation::{build_prompt, strip_quotes, top_examples, GenerationRequest, Prompt};
use pitch_core::section_type::SectionType;
use pitch_core::types::DbId;
use pitch_db::models::section::Section;
use pitch_db::PitchStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ComposerError, GenerationError};
use crate::session::ComposerSession;

/// Token accounting reported by the completion endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Raw completion text as returned upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub usage: Option<Usage>,
}

/// A text-completion endpoint.
#[async_trait]
pub trait TextCompletionClient: Send + Sync {
    /// Any failure is reported as [`GenerationError::Upstream`]. No retries.
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, GenerationError>;
}

/// Generated copy ready for a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedText {
    pub text: String,
    pub usage: Option<Usage>,
    pub example_count: usize,
}

/// Request parameters when the section type comes from the section itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionGenerationParams {
    pub project_type: Option<String>,
    pub medium: Option<String>,
    pub target_audience: Option<String>,
}

pub struct GenerationBridge {
    store: Arc<dyn PitchStore>,
    client: Arc<dyn TextCompletionClient>,
}

impl GenerationBridge {
    pub fn new(store: Arc<dyn PitchStore>, client: Arc<dyn TextCompletionClient>) -> Self {
        Self { store, client }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedText, GenerationError> {
        let request = request.validate().map_err(|e| match e {
            CoreError::Validation(msg) => GenerationError::MissingParameter(msg),
            other => GenerationError::MissingParameter(other.to_string()),
        })?;

        let examples = self
            .store
            .top_ai_examples(&request.section_type, &request.project_type)
            .await?;
        let examples = top_examples(examples, |e| e.quality_score);
        if examples.is_empty() {
            tracing::warn!(
                section_type = %request.section_type,
                project_type = %request.project_type,
                "No AI examples for generation request"
            );
            return Err(GenerationError::NoExamples {
                section_type: request.section_type,
                project_type: request.project_type,
            });
        }

        let texts: Vec<&str> = examples.iter().map(|e| e.text.as_str()).collect();
        let prompt = build_prompt(&request, &texts);
        let completion = self.client.complete(&prompt).await.map_err(|e| {
            tracing::error!(section_type = %request.section_type, error = %e, "Text generation failed");
            e
        })?;

        let text = strip_quotes(&completion.text);
        if text.is_empty() {
            return Err(GenerationError::Upstream("Completion returned no text".to_string()));
        }

        // Usage counters are bookkeeping; a failure does not void the result.
        let ids: Vec<DbId> = examples.iter().map(|e| e.id).collect();
        if let Err(e) = self.store.increment_ai_example_usage(&ids).await {
            tracing::warn!(error = %e, "Failed to record AI example usage");
        }

        tracing::info!(
            section_type = %request.section_type,
            examples = examples.len(),
            "Generated section text"
        );
        Ok(GeneratedText {
            text,
            usage: completion.usage,
            example_count: examples.len(),
        })
    }

    /// Generate copy for an open section and write it into the section's
    /// text field as a partial content update.
    pub async fn generate_into_section(
        &self,
        session: &ComposerSession,
        section_id: DbId,
        params: &SectionGenerationParams,
    ) -> Result<(Section, GeneratedText), ComposerError> {
        let section = session.section(section_id).ok_or(CoreError::NotFound {
            entity: "Section",
            id: section_id,
        })?;
        let section_type: SectionType = section.section_type.parse()?;
        let key = text_key(section_type).ok_or_else(|| {
            CoreError::Validation(format!("Section type '{section_type}' has no text to generate"))
        })?;

        let generated = self
            .generate(&GenerationRequest {
                project_type: params.project_type.clone(),
                medium: params.medium.clone(),
                target_audience: params.target_audience.clone(),
                section_type: Some(section_type.as_str().to_string()),
            })
            .await?;

        let updated = session.update_content(section_id, key, Value::String(generated.text.clone()))?;
        Ok((updated, generated))
    }
}

/// The content key generated copy lands in.
fn text_key(section_type: SectionType) -> Option<&'static str> {
    legal_keys(section_type)
        .iter()
        .copied()
        .find(|k| *k == "text" || *k == "description")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_key_per_section_type() {
        assert_eq!(text_key(SectionType::Goal), Some("text"));
        assert_eq!(text_key(SectionType::Cases), Some("description"));
        assert_eq!(text_key(SectionType::Timeline), Some("description"));
        assert_eq!(text_key(SectionType::Deliverables), Some("text"));
        assert_eq!(text_key(SectionType::ExampleWork), None);
        assert_eq!(text_key(SectionType::Quote), None);
    }
}

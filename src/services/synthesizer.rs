use crate::core::fallback::{local_explanation, no_schemes_text};
use crate::core::prompts::{build_recommendation_prompt, build_synthesis_prompt, PromptLimits};
use crate::core::recommendations::{parse_llm_recommendations, ParsedRecommendations};
use crate::models::{Profile, RetrievedChunk, Scheme};
use crate::services::llm::LlmClient;

/// Turns matched schemes or retrieved snippets into citizen-facing output
///
/// Uses the external model when it is configured and answers with usable
/// text; otherwise falls back to deterministic local output. Never fails.
pub struct Synthesizer {
    llm: LlmClient,
    limits: PromptLimits,
    max_snippet_chars: usize,
}

impl Synthesizer {
    pub fn new(llm: LlmClient, limits: PromptLimits, max_snippet_chars: usize) -> Self {
        Self {
            llm,
            limits,
            max_snippet_chars,
        }
    }

    pub fn llm(&self) -> &LlmClient {
        &self.llm
    }

    /// Explain why each scheme fits the profile, in the requested language
    pub async fn synthesize(&self, profile: &Profile, schemes: &[Scheme], language: &str) -> String {
        if schemes.is_empty() {
            return no_schemes_text(language).to_string();
        }

        if self.llm.is_configured() {
            let prompt = build_synthesis_prompt(profile, schemes, language, &self.limits);
            match self.llm.complete(&prompt).await {
                Ok(text) if !text.trim().is_empty() => return text.trim().to_string(),
                Ok(_) => tracing::warn!("LLM returned blank text, using local explanation"),
                Err(e) => tracing::warn!("LLM synthesis failed, using local explanation: {}", e),
            }
        }

        local_explanation(schemes, language)
    }

    /// Ask the model for structured recommendations over retrieved snippets
    ///
    /// Returns an empty result when the model is unavailable; callers then
    /// group the snippets themselves.
    pub async fn synthesize_recommendations(
        &self,
        profile: &Profile,
        chunks: &[RetrievedChunk],
    ) -> ParsedRecommendations {
        if chunks.is_empty() || !self.llm.is_configured() {
            return ParsedRecommendations::default();
        }

        let prompt = build_recommendation_prompt(profile, chunks, &self.limits);
        match self.llm.complete(&prompt).await {
            Ok(text) => parse_llm_recommendations(&text, self.max_snippet_chars),
            Err(e) => {
                tracing::warn!("LLM recommendation call failed: {}", e);
                ParsedRecommendations::default()
            }
        }
    }
}

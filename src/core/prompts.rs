//! Prompt construction for scheme explanations and recommendations

use crate::core::normalizer::normalize_profile;
use crate::models::{Profile, RetrievedChunk, Scheme};

/// Maximum characters of the joined scheme context block
pub const MAX_CONTEXT_CHARS: usize = 8000;

/// Maximum characters of the profile block
pub const MAX_PROFILE_CHARS: usize = 2000;

/// Length limits applied while rendering prompts
#[derive(Debug, Clone, Copy)]
pub struct PromptLimits {
    pub max_profile_chars: usize,
    pub max_context_chars: usize,
}

impl Default for PromptLimits {
    fn default() -> Self {
        Self {
            max_profile_chars: MAX_PROFILE_CHARS,
            max_context_chars: MAX_CONTEXT_CHARS,
        }
    }
}

/// True for language codes that select Hindi output (`hi`, `hindi`, `Hi-IN`, ...)
#[inline]
pub fn is_hindi(language: &str) -> bool {
    language
        .chars()
        .next()
        .map(|c| c.eq_ignore_ascii_case(&'h'))
        .unwrap_or(false)
}

/// Prefix cut measured in characters, never splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Render the present profile fields as `key: value` lines
pub fn profile_block(profile: &Profile, max_chars: usize) -> String {
    let normalized = normalize_profile(profile);
    let mut lines = Vec::new();

    if let Some(name) = profile.name.as_deref().filter(|n| !n.trim().is_empty()) {
        lines.push(format!("name: {}", name.trim()));
    }
    if let Some(age) = normalized.age {
        lines.push(format!("age: {}", age));
    }
    if let Some(gender) = profile.gender.as_deref().filter(|g| !g.trim().is_empty()) {
        lines.push(format!("gender: {}", gender.trim()));
    }
    if let Some(state) = profile.resident_state().filter(|s| !s.trim().is_empty()) {
        lines.push(format!("state: {}", state.trim()));
    }
    if let Some(income) = normalized.income {
        lines.push(format!("annual income: {}", income));
    }
    if !normalized.occupation.is_empty() {
        lines.push(format!("occupation: {}", normalized.occupation));
    }
    if let Some(text) = profile.text.as_deref().filter(|t| !t.trim().is_empty()) {
        lines.push(format!("description: {}", text.trim()));
    }

    if lines.is_empty() {
        return "(no profile details provided)".to_string();
    }

    truncate_chars(&lines.join("\n"), max_chars)
}

/// Render scheme summaries, cut to the context budget after joining
///
/// The cut is a plain prefix and may end in the middle of an entry.
pub fn scheme_context(schemes: &[Scheme], max_chars: usize) -> String {
    let entries: Vec<String> = schemes
        .iter()
        .map(|scheme| {
            format!(
                "- {}\n  Benefits: {}\n  Criteria: {}\n  Source: {}",
                scheme.name,
                scheme.benefits,
                scheme.eligibility.join("; "),
                scheme.source_url
            )
        })
        .collect();

    truncate_chars(&entries.join("\n"), max_chars)
}

/// Build the plain-text explanation prompt for matched schemes
pub fn build_synthesis_prompt(
    profile: &Profile,
    schemes: &[Scheme],
    language: &str,
    limits: &PromptLimits,
) -> String {
    let language_name = if is_hindi(language) { "Hindi" } else { "English" };

    format!(
        r#"You are an assistant that explains Indian government welfare schemes to citizens in simple words.
You give advisory guidance only, not legal advice.

Citizen profile:
{}

Candidate schemes:
{}

Instructions:
1. For each candidate scheme that matches the citizen, write exactly one bullet: "- <scheme name>: <one short sentence explaining why it fits>".
2. Omit schemes that do not match the citizen.
3. Finish with 1-2 bullets suggesting next steps (documents to keep ready, where to apply).
4. Reply in plain text only: no headings, no markdown formatting, no JSON.
5. Write the whole reply in {}.

Answer:"#,
        profile_block(profile, limits.max_profile_chars),
        scheme_context(schemes, limits.max_context_chars),
        language_name
    )
}

/// Build the JSON-producing recommendation prompt from retrieved snippets
pub fn build_recommendation_prompt(
    profile: &Profile,
    chunks: &[RetrievedChunk],
    limits: &PromptLimits,
) -> String {
    let profile_json = serde_json::to_string(profile).unwrap_or_else(|_| "{}".to_string());

    let snippets: Vec<String> = chunks
        .iter()
        .enumerate()
        .map(|(idx, chunk)| {
            let source = chunk
                .url
                .as_deref()
                .or(chunk.scheme_id.as_deref())
                .unwrap_or("unknown");
            format!("[{}] \"{}\" (source: {})", idx, chunk.full_text, source)
        })
        .collect();

    format!(
        r#"You are an assistant that matches citizens to government welfare schemes.
You give advisory guidance only, not legal advice.

Citizen profile:
{}

Retrieved clauses:
{}

Task:
1. Recommend up to 5 schemes. For each give the scheme id and title when available, an eligibility label (Eligible / Not eligible / Possibly eligible), required documents when listed, the apply link when present, and the supporting clauses you relied on.
2. Give each recommendation a confidence score from 0 to 100.

Return JSON only, in exactly this format:
{{"recommendations": [{{"scheme_id": "", "title": "", "eligibility_label": "", "confidence": 0.0, "required_documents": [], "apply_link": "", "supporting_snippets": [{{"text": "", "url": "", "score": 0.0}}]}}]}}"#,
        truncate_chars(&profile_json, limits.max_profile_chars),
        truncate_chars(&snippets.join("\n"), limits.max_context_chars)
    )
}

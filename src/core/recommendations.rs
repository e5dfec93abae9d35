use serde_json::Value;
use crate::core::prompts::truncate_chars;
use crate::models::{EligibilityLabel, Recommendation, RecommendationSnippet, RetrievedChunk};

/// Maximum number of snippet groups turned into fallback recommendations
pub const MAX_FALLBACK_RECOMMENDATIONS: usize = 5;

/// Confidence given to recommendations built without a language model
pub const FALLBACK_CONFIDENCE: f64 = 60.0;

/// Recommendations parsed out of a language model reply
#[derive(Debug, Clone, Default)]
pub struct ParsedRecommendations {
    pub recommendations: Vec<Recommendation>,
    /// Raw reply, kept when it did not carry a recommendation list
    pub llm_text: Option<String>,
}

/// Parse a reply that was asked to be JSON
///
/// Parsing starts at the first `{`; anything after the first complete value
/// is ignored. Failures keep the raw text and yield no recommendations.
pub fn parse_llm_recommendations(text: &str, max_snippet_chars: usize) -> ParsedRecommendations {
    let start = text.find('{').unwrap_or(0);
    let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();

    let parsed = match stream.next() {
        Some(Ok(value)) => value,
        Some(Err(e)) => {
            tracing::warn!("Failed to parse LLM JSON output: {}", e);
            return raw_reply(text);
        }
        None => return raw_reply(text),
    };

    match parsed.get("recommendations").and_then(|r| r.as_array()) {
        Some(items) => ParsedRecommendations {
            recommendations: items
                .iter()
                .filter(|item| item.is_object())
                .map(|item| recommendation_from_value(item, max_snippet_chars))
                .collect(),
            llm_text: None,
        },
        None => raw_reply(text),
    }
}

fn raw_reply(text: &str) -> ParsedRecommendations {
    ParsedRecommendations {
        recommendations: Vec::new(),
        llm_text: Some(text.to_string()),
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Shape one model-provided recommendation object
pub fn recommendation_from_value(value: &Value, max_snippet_chars: usize) -> Recommendation {
    let confidence = number_field(value, "confidence")
        .filter(|c| c.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0);

    let required_documents = value
        .get("required_documents")
        .and_then(|d| d.as_array())
        .map(|docs| docs.iter().filter_map(|d| d.as_str()).map(str::to_string).collect())
        .unwrap_or_default();

    let supporting_snippets = value
        .get("supporting_snippets")
        .and_then(|s| s.as_array())
        .map(|snippets| {
            snippets
                .iter()
                .filter(|s| s.is_object())
                .map(|s| RecommendationSnippet {
                    text: truncate_chars(s.get("text").and_then(|t| t.as_str()).unwrap_or(""), max_snippet_chars),
                    scheme_id: string_field(s, "scheme_id"),
                    url: string_field(s, "url"),
                    page_no: s.get("page_no").and_then(|p| p.as_i64()),
                    score: number_field(s, "score"),
                })
                .collect()
        })
        .unwrap_or_default();

    Recommendation {
        scheme_id: string_field(value, "scheme_id").unwrap_or_default(),
        title: string_field(value, "title").unwrap_or_default(),
        eligibility_label: value
            .get("eligibility_label")
            .and_then(|l| l.as_str())
            .map(EligibilityLabel::parse)
            .unwrap_or(EligibilityLabel::PossiblyEligible),
        confidence,
        required_documents,
        apply_link: string_field(value, "apply_link"),
        supporting_snippets,
    }
}

/// Group retrieved chunks by scheme into advisory recommendations
///
/// Groups keep first-seen order and the first few become recommendations.
pub fn recommendations_from_chunks(chunks: &[RetrievedChunk], max_snippet_chars: usize) -> Vec<Recommendation> {
    let mut groups: Vec<(String, Vec<&RetrievedChunk>)> = Vec::new();

    for (idx, chunk) in chunks.iter().enumerate() {
        let key = chunk
            .scheme_id
            .clone()
            .or_else(|| chunk.id.clone())
            .unwrap_or_else(|| format!("unknown_{}", idx));

        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, items)) => items.push(chunk),
            None => groups.push((key, vec![chunk])),
        }
    }

    groups
        .into_iter()
        .take(MAX_FALLBACK_RECOMMENDATIONS)
        .map(|(scheme_id, items)| {
            let title = items
                .first()
                .and_then(|c| c.title.clone())
                .unwrap_or_else(|| scheme_id.clone());

            Recommendation {
                title,
                eligibility_label: EligibilityLabel::PossiblyEligible,
                confidence: FALLBACK_CONFIDENCE,
                required_documents: Vec::new(),
                apply_link: items.first().and_then(|c| c.url.clone()),
                supporting_snippets: items
                    .iter()
                    .map(|c| RecommendationSnippet {
                        text: truncate_chars(&c.text, max_snippet_chars),
                        scheme_id: c.scheme_id.clone(),
                        url: c.url.clone(),
                        page_no: c.page_no,
                        score: c.score,
                    })
                    .collect(),
                scheme_id,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, scheme_id: Option<&str>, text: &str) -> RetrievedChunk {
        RetrievedChunk {
            id: Some(id.to_string()),
            text: text.to_string(),
            full_text: text.to_string(),
            scheme_id: scheme_id.map(str::to_string),
            title: scheme_id.map(|s| format!("Title {}", s)),
            url: Some(format!("https://example.gov.in/{}", id)),
            page_no: Some(1),
            score: Some(0.2),
        }
    }

    #[test]
    fn test_parse_json_after_preamble() {
        let reply = r#"Sure! {"recommendations": [{"scheme_id": "pm_kisan", "title": "PM-KISAN", "eligibility_label": "Eligible", "confidence": 130, "supporting_snippets": [{"text": "abcdef", "url": "u"}]}]} trailing"#;

        let parsed = parse_llm_recommendations(reply, 3);

        assert!(parsed.llm_text.is_none());
        assert_eq!(parsed.recommendations.len(), 1);
        let rec = &parsed.recommendations[0];
        assert_eq!(rec.scheme_id, "pm_kisan");
        assert_eq!(rec.eligibility_label, EligibilityLabel::Eligible);
        assert_eq!(rec.confidence, 100.0);
        assert_eq!(rec.supporting_snippets[0].text, "abc");
        assert!(rec.apply_link.is_none());
    }

    #[test]
    fn test_unparseable_reply_keeps_text() {
        let parsed = parse_llm_recommendations("I cannot help with that {oops", 320);
        assert!(parsed.recommendations.is_empty());
        assert_eq!(parsed.llm_text.as_deref(), Some("I cannot help with that {oops"));
    }

    #[test]
    fn test_object_without_recommendations_keeps_text() {
        let parsed = parse_llm_recommendations(r#"{"answer": "none"}"#, 320);
        assert!(parsed.recommendations.is_empty());
        assert!(parsed.llm_text.is_some());
    }

    #[test]
    fn test_unknown_label_defaults() {
        let value = serde_json::json!({"eligibility_label": "Likely", "confidence": "72.5"});
        let rec = recommendation_from_value(&value, 320);
        assert_eq!(rec.eligibility_label, EligibilityLabel::PossiblyEligible);
        assert_eq!(rec.confidence, 72.5);
    }

    #[test]
    fn test_chunks_grouped_by_scheme() {
        let chunks = vec![
            chunk("a", Some("pm_kisan"), "one"),
            chunk("b", Some("pmjay"), "two"),
            chunk("c", Some("pm_kisan"), "three"),
            chunk("d", None, "four"),
        ];

        let recs = recommendations_from_chunks(&chunks, 320);

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].scheme_id, "pm_kisan");
        assert_eq!(recs[0].supporting_snippets.len(), 2);
        assert_eq!(recs[0].title, "Title pm_kisan");
        assert_eq!(recs[0].apply_link.as_deref(), Some("https://example.gov.in/a"));
        assert_eq!(recs[0].confidence, FALLBACK_CONFIDENCE);
        assert_eq!(recs[2].scheme_id, "d");
        assert_eq!(recs[2].title, "d");
    }

    #[test]
    fn test_grouping_caps_recommendations() {
        let chunks: Vec<RetrievedChunk> = (0..8)
            .map(|i| chunk(&i.to_string(), Some(&format!("s{}", i)), "x"))
            .collect();

        assert_eq!(recommendations_from_chunks(&chunks, 320).len(), MAX_FALLBACK_RECOMMENDATIONS);
    }
}

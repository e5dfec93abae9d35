use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Literal jurisdiction value marking a scheme available in every state
pub const NATIONWIDE_MARKER: &str = "ALL";

/// Citizen profile as submitted by clients
///
/// Every field is optional and numeric fields are kept loosely typed; the
/// normalizer decides what is usable. Text fields holding a non-string value
/// read as absent instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Older clients send the state under this key
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    /// Free-form description (english/hindi)
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Profile {
    /// `state`, else the `jurisdiction` spelling
    pub fn resident_state(&self) -> Option<&str> {
        self.state.as_deref().or(self.jurisdiction.as_deref())
    }

    /// `income`, else the `annual_income` spelling
    pub fn income_value(&self) -> Option<&Value> {
        self.income.as_ref().or(self.annual_income.as_ref())
    }
}

/// Strings pass through; anything else is treated as missing
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Region restriction of a scheme
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Jurisdiction {
    #[default]
    Nationwide,
    Region(String),
}

impl Jurisdiction {
    pub fn region(name: &str) -> Self {
        Jurisdiction::from(name.to_string())
    }

    pub fn is_nationwide(&self) -> bool {
        matches!(self, Jurisdiction::Nationwide)
    }
}

impl From<String> for Jurisdiction {
    fn from(value: String) -> Self {
        if value == NATIONWIDE_MARKER {
            Jurisdiction::Nationwide
        } else {
            Jurisdiction::Region(value)
        }
    }
}

impl From<Jurisdiction> for String {
    fn from(value: Jurisdiction) -> Self {
        match value {
            Jurisdiction::Nationwide => NATIONWIDE_MARKER.to_string(),
            Jurisdiction::Region(name) => name,
        }
    }
}

/// Welfare scheme record with English and Hindi text
///
/// Deserialization is lenient so clients can post back either catalog
/// records or `/retrieve` matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scheme {
    pub id: String,
    pub name: String,
    pub name_hi: String,
    pub description: String,
    pub description_hi: String,
    pub eligibility: Vec<String>,
    pub eligibility_hi: Vec<String>,
    pub benefits: String,
    pub benefits_hi: String,
    pub category: String,
    pub category_hi: String,
    pub source_url: String,
    pub jurisdiction: Jurisdiction,
}

/// Scheme matched against a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeMatch {
    #[serde(flatten)]
    pub scheme: Scheme,
    pub match_score: f64,
    pub is_eligible: bool,
}

/// Closed set of eligibility labels used in recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityLabel {
    #[serde(rename = "Eligible")]
    Eligible,
    #[serde(rename = "Not eligible")]
    NotEligible,
    #[serde(rename = "Possibly eligible")]
    PossiblyEligible,
}

impl EligibilityLabel {
    /// Lenient parse for labels coming back from a language model
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "eligible" => EligibilityLabel::Eligible,
            "not eligible" | "ineligible" => EligibilityLabel::NotEligible,
            _ => EligibilityLabel::PossiblyEligible,
        }
    }
}

/// Chunk returned by the vector store for a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub id: Option<String>,
    /// Text cut to the configured snippet length
    pub text: String,
    pub full_text: String,
    pub scheme_id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub page_no: Option<i64>,
    pub score: Option<f64>,
}

/// Citation attached to a recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSnippet {
    pub text: String,
    pub scheme_id: Option<String>,
    pub url: Option<String>,
    pub page_no: Option<i64>,
    pub score: Option<f64>,
}

/// Recommendation produced by the vector-store pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub scheme_id: String,
    pub title: String,
    pub eligibility_label: EligibilityLabel,
    pub confidence: f64,
    #[serde(default)]
    pub required_documents: Vec<String>,
    pub apply_link: Option<String>,
    pub supporting_snippets: Vec<RecommendationSnippet>,
}

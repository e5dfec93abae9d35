use serde::{Deserialize, Serialize};
use crate::models::domain::{Profile, Scheme};

/// Request to match a profile against the scheme catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrieveRequest {
    #[serde(default)]
    pub profile: Profile,
}

/// Request to explain a set of schemes to a citizen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub schemes: Vec<Scheme>,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_request_defaults() {
        let req: SynthesizeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.language, "en");
        assert!(req.schemes.is_empty());
    }
}

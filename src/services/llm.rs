use crate::config::LlmSettings;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling a language model provider
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM provider is not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    RequestError(reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Response did not contain any text")]
    EmptyResponse,

    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),

    #[error("All endpoints failed: {0}")]
    AllEndpointsFailed(String),
}

impl From<reqwest::Error> for LlmError {
    /// Request URLs are dropped so error text never carries credentials
    fn from(e: reqwest::Error) -> Self {
        LlmError::RequestError(e.without_url())
    }
}

/// Supported language model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Gemini,
    /// Never calls out; callers use their local fallback
    Local,
}

impl LlmProvider {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "openai" => LlmProvider::OpenAi,
            "gemini" => LlmProvider::Gemini,
            "local" | "" => LlmProvider::Local,
            other => {
                tracing::warn!("Unknown LLM provider '{}', using local fallback", other);
                LlmProvider::Local
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Gemini => "gemini",
            LlmProvider::Local => "local",
        }
    }
}

/// One way of reaching a provider; strategies are tried in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointStrategy {
    /// OpenAI-style chat completions with bearer auth
    ChatCompletions { url: String },
    /// Gemini `generateContent` with the key in the `x-goog-api-key` header
    GenerateContent { url: String },
    /// Older `{prompt, max_output_tokens}` endpoint with bearer auth
    LegacyGenerate { url: String },
}

impl EndpointStrategy {
    pub fn url(&self) -> &str {
        match self {
            EndpointStrategy::ChatCompletions { url }
            | EndpointStrategy::GenerateContent { url }
            | EndpointStrategy::LegacyGenerate { url } => url,
        }
    }
}

/// Language model HTTP client
///
/// Holds credentials and endpoint shapes for one provider. Every call is
/// bounded by a single timeout shared by all strategies.
pub struct LlmClient {
    provider: LlmProvider,
    settings: LlmSettings,
    timeout: Duration,
    client: Client,
}

impl LlmClient {
    /// Create a new client from settings
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let timeout = settings.timeout();
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            provider: LlmProvider::parse(&settings.provider),
            settings,
            timeout,
            client,
        })
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn api_key(&self) -> Option<&str> {
        let key = match self.provider {
            LlmProvider::OpenAi => self.settings.openai_api_key.as_deref(),
            LlmProvider::Gemini => self.settings.gemini_api_key.as_deref(),
            LlmProvider::Local => None,
        };
        key.filter(|k| !k.trim().is_empty())
    }

    /// True when the selected provider has a credential
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn gemini_configured(&self) -> bool {
        self.settings
            .gemini_api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }

    /// Ordered endpoint strategies for the selected provider
    pub fn strategies(&self) -> Vec<EndpointStrategy> {
        match self.provider {
            LlmProvider::OpenAi => vec![EndpointStrategy::ChatCompletions {
                url: format!("{}/chat/completions", self.settings.openai_base_url.trim_end_matches('/')),
            }],
            LlmProvider::Gemini => {
                let base = self.settings.gemini_base_url.trim_end_matches('/');
                let mut strategies: Vec<EndpointStrategy> = self
                    .settings
                    .gemini_api_versions
                    .iter()
                    .map(|version| EndpointStrategy::GenerateContent {
                        url: format!("{}/{}/models/{}:generateContent", base, version, self.settings.gemini_model),
                    })
                    .collect();
                if let Some(url) = self.settings.gemini_legacy_url.as_ref().filter(|u| !u.is_empty()) {
                    strategies.push(EndpointStrategy::LegacyGenerate { url: url.clone() });
                }
                strategies
            }
            LlmProvider::Local => Vec::new(),
        }
    }

    /// Send a prompt and return the generated text
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if !self.is_configured() {
            return Err(LlmError::NotConfigured);
        }

        let timeout = self.timeout();
        match tokio::time::timeout(timeout, self.try_strategies(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(timeout)),
        }
    }

    async fn try_strategies(&self, prompt: &str) -> Result<String, LlmError> {
        let mut failures = Vec::new();

        for strategy in self.strategies() {
            match self.call(&strategy, prompt).await {
                Ok(text) => {
                    tracing::debug!("LLM endpoint {} answered ({} chars)", strategy.url(), text.len());
                    return Ok(text);
                }
                Err(e) => {
                    tracing::warn!("LLM endpoint {} failed: {}", strategy.url(), e);
                    failures.push(format!("{}: {}", strategy.url(), e));
                }
            }
        }

        Err(LlmError::AllEndpointsFailed(failures.join("; ")))
    }

    async fn call(&self, strategy: &EndpointStrategy, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key().ok_or(LlmError::NotConfigured)?;
        let max_tokens = self.settings.max_output_tokens;
        let temperature = self.settings.temperature;

        let request = match strategy {
            EndpointStrategy::ChatCompletions { url } => self
                .client
                .post(url)
                .bearer_auth(api_key)
                .json(&json!({
                    "model": self.settings.openai_model,
                    "messages": [{"role": "user", "content": prompt}],
                    "max_tokens": max_tokens,
                    "temperature": temperature,
                })),
            EndpointStrategy::GenerateContent { url } => self
                .client
                .post(url)
                .header("x-goog-api-key", api_key)
                .json(&json!({
                    "contents": [{"role": "user", "parts": [{"text": prompt}]}],
                    "generationConfig": {
                        "maxOutputTokens": max_tokens,
                        "temperature": temperature,
                    },
                })),
            EndpointStrategy::LegacyGenerate { url } => self
                .client
                .post(url)
                .bearer_auth(api_key)
                .json(&json!({
                    "prompt": prompt,
                    "max_output_tokens": max_tokens,
                })),
        };

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(LlmError::ApiError { status, body });
        }

        let json: Value = response.json().await?;

        extract_text(&json).ok_or(LlmError::EmptyResponse)
    }
}

/// Pull generated text out of the response shapes providers use
///
/// Returns trimmed, non-empty text or `None`.
pub fn extract_text(value: &Value) -> Option<String> {
    let candidates = [
        // OpenAI chat
        value.pointer("/choices/0/message/content").and_then(Value::as_str).map(str::to_string),
        // OpenAI completions
        value.pointer("/choices/0/text").and_then(Value::as_str).map(str::to_string),
        // Gemini generateContent
        value
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.get("text").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("")
            }),
        // Legacy Gemini shapes
        value.pointer("/candidates/0/content").and_then(Value::as_str).map(str::to_string),
        value.pointer("/candidates/0/output").and_then(Value::as_str).map(str::to_string),
        value.pointer("/output/text").and_then(Value::as_str).map(str::to_string),
        value.get("output").and_then(Value::as_str).map(str::to_string),
        value.get("text").and_then(Value::as_str).map(str::to_string),
    ];

    candidates
        .into_iter()
        .flatten()
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(provider: &str, key: Option<&str>) -> LlmClient {
        LlmClient::new(LlmSettings {
            provider: provider.to_string(),
            openai_api_key: key.map(str::to_string),
            gemini_api_key: key.map(str::to_string),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_extract_openai_chat() {
        let value = json!({"choices": [{"message": {"role": "assistant", "content": " hello "}}]});
        assert_eq!(extract_text(&value).as_deref(), Some("hello"));
    }

    #[test]
    fn test_extract_gemini_parts() {
        let value = json!({"candidates": [{"content": {"parts": [{"text": "a"}, {"text": "b"}]}}]});
        assert_eq!(extract_text(&value).as_deref(), Some("ab"));
    }

    #[test]
    fn test_extract_legacy_shapes() {
        assert_eq!(extract_text(&json!({"candidates": [{"content": "x"}]})).as_deref(), Some("x"));
        assert_eq!(extract_text(&json!({"candidates": [{"output": "y"}]})).as_deref(), Some("y"));
        assert_eq!(extract_text(&json!({"output": {"text": "z"}})).as_deref(), Some("z"));
        assert_eq!(extract_text(&json!({"text": "t"})).as_deref(), Some("t"));
    }

    #[test]
    fn test_extract_blank_is_none() {
        assert_eq!(extract_text(&json!({"choices": [{"message": {"content": "  "}}]})), None);
        assert_eq!(extract_text(&json!({"error": "quota"})), None);
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(LlmProvider::parse("OpenAI"), LlmProvider::OpenAi);
        assert_eq!(LlmProvider::parse("gemini"), LlmProvider::Gemini);
        assert_eq!(LlmProvider::parse("mystery"), LlmProvider::Local);
    }

    #[test]
    fn test_configuration_requires_key() {
        assert!(!client("openai", None).is_configured());
        assert!(!client("openai", Some(" ")).is_configured());
        assert!(client("openai", Some("sk-test")).is_configured());
        assert!(!client("local", Some("sk-test")).is_configured());
    }

    #[test]
    fn test_gemini_strategy_order() {
        let mut settings = LlmSettings {
            provider: "gemini".to_string(),
            gemini_api_key: Some("k".to_string()),
            gemini_legacy_url: Some("https://legacy.example/generate".to_string()),
            ..Default::default()
        };
        settings.gemini_base_url = "https://g.example/".to_string();
        let client = LlmClient::new(settings).unwrap();

        let urls: Vec<String> = client.strategies().iter().map(|s| s.url().to_string()).collect();

        assert_eq!(
            urls,
            vec![
                "https://g.example/v1beta/models/gemini-1.5-flash:generateContent",
                "https://g.example/v1/models/gemini-1.5-flash:generateContent",
                "https://legacy.example/generate",
            ]
        );
    }

    #[test]
    fn test_timeout_from_settings() {
        let fast = LlmClient::new(LlmSettings {
            timeout_ms: Some(250),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(fast.timeout(), Duration::from_millis(250));
        assert_eq!(client("openai", None).timeout(), Duration::from_secs(25));
    }

    #[tokio::test]
    async fn test_request_error_hides_gemini_key() {
        let client = LlmClient::new(LlmSettings {
            provider: "gemini".to_string(),
            gemini_api_key: Some("SECRET-KEY-123".to_string()),
            gemini_base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: Some(5_000),
            ..Default::default()
        })
        .unwrap();

        let err = client.complete("hello").await.unwrap_err();
        let text = err.to_string();

        assert!(matches!(err, LlmError::AllEndpointsFailed(_) | LlmError::Timeout(_)));
        assert!(!text.contains("SECRET-KEY-123"), "{}", text);
    }

    #[tokio::test]
    async fn test_request_error_drops_url() {
        let e = Client::new()
            .get("http://127.0.0.1:9/models?key=SECRET-KEY-123")
            .send()
            .await
            .unwrap_err();

        let err = LlmError::from(e);

        assert!(!err.to_string().contains("SECRET-KEY-123"));
    }

    #[tokio::test]
    async fn test_unconfigured_client_never_calls_out() {
        let result = client("openai", None).complete("hello").await;
        assert!(matches!(result, Err(LlmError::NotConfigured)));
    }
}

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub synthesis: SynthesisSettings,
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    #[serde(default)]
    pub vector_store: VectorStoreSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

/// External language model provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// `openai`, `gemini` or `local`
    #[serde(default = "default_provider")]
    pub provider: String,
    pub openai_api_key: Option<String>,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// API versions tried in order for `generateContent`
    #[serde(default = "default_gemini_api_versions")]
    pub gemini_api_versions: Vec<String>,
    /// Optional legacy endpoint taking `{prompt, max_output_tokens}`
    pub gemini_legacy_url: Option<String>,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
    /// Overrides `timeout_secs` when set
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default)]
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            openai_model: default_openai_model(),
            gemini_api_key: None,
            gemini_base_url: default_gemini_base_url(),
            gemini_model: default_gemini_model(),
            gemini_api_versions: default_gemini_api_versions(),
            gemini_legacy_url: None,
            timeout_secs: default_llm_timeout(),
            timeout_ms: None,
            max_output_tokens: default_max_output_tokens(),
            temperature: 0.0,
        }
    }
}

impl LlmSettings {
    /// Budget for one synthesis call across all endpoint strategies
    pub fn timeout(&self) -> Duration {
        match self.timeout_ms {
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_secs(self.timeout_secs),
        }
    }
}

fn default_provider() -> String { "openai".to_string() }
fn default_openai_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_openai_model() -> String { "gpt-4o-mini".to_string() }
fn default_gemini_base_url() -> String { "https://generativelanguage.googleapis.com".to_string() }
fn default_gemini_model() -> String { "gemini-1.5-flash".to_string() }
fn default_gemini_api_versions() -> Vec<String> { vec!["v1beta".to_string(), "v1".to_string()] }
fn default_llm_timeout() -> u64 { 25 }
fn default_max_output_tokens() -> u32 { 800 }

#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisSettings {
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
    #[serde(default = "default_max_profile_chars")]
    pub max_profile_chars: usize,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            max_context_chars: default_max_context_chars(),
            max_profile_chars: default_max_profile_chars(),
        }
    }
}

fn default_max_context_chars() -> usize { crate::core::prompts::MAX_CONTEXT_CHARS }
fn default_max_profile_chars() -> usize { crate::core::prompts::MAX_PROFILE_CHARS }

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalSettings {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_max_snippet_chars")]
    pub max_snippet_chars: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_snippet_chars: default_max_snippet_chars(),
        }
    }
}

fn default_top_k() -> usize { 6 }
fn default_max_snippet_chars() -> usize { 320 }

#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreSettings {
    #[serde(default = "default_chroma_url")]
    pub url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            url: default_chroma_url(),
            collection: default_collection(),
            timeout_secs: default_store_timeout(),
        }
    }
}

fn default_chroma_url() -> String { "http://localhost:8001".to_string() }
fn default_collection() -> String { "schemes".to_string() }
fn default_store_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    /// `openai` or `ollama`
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            api_key: None,
            timeout_secs: default_store_timeout(),
        }
    }
}

fn default_embedding_provider() -> String { "ollama".to_string() }
fn default_embedding_endpoint() -> String { "http://localhost:11434".to_string() }
fn default_embedding_model() -> String { "all-minilm".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Output shape of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    Pretty,
    Compact,
}

impl LoggingSettings {
    /// Unknown names fall back to compact text
    pub fn log_format(&self) -> LogFormat {
        match self.format.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CIVIC__)
    /// 5. Plain deployment variables (OPENAI_API_KEY, TOP_K, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CIVIC__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CIVIC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CIVIC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Plain environment variables understood by existing deployments
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("LLM_PROVIDER", "llm.provider"),
    ("OPENAI_API_KEY", "llm.openai_api_key"),
    ("GEMINI_API_KEY", "llm.gemini_api_key"),
    ("GEMINI_URL", "llm.gemini_legacy_url"),
    ("CHROMA_URL", "vector_store.url"),
    ("EMBED_MODEL_NAME", "embedding.model"),
    ("PORT", "server.port"),
];

/// Numeric variables; unparseable values are ignored
const NUMERIC_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("TOP_K", "retrieval.top_k"),
    ("MAX_SNIPPET_CHARS", "retrieval.max_snippet_chars"),
];

/// Apply plain deployment variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in ENV_OVERRIDES {
        if let Ok(value) = env::var(var) {
            if !value.trim().is_empty() {
                builder = builder.set_override(*key, value)?;
            }
        }
    }

    for (var, key) in NUMERIC_ENV_OVERRIDES {
        if let Some(value) = env::var(var).ok().and_then(|v| v.trim().parse::<i64>().ok()) {
            builder = builder.set_override(*key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_llm_settings() {
        let llm = LlmSettings::default();
        assert_eq!(llm.provider, "openai");
        assert_eq!(llm.timeout_secs, 25);
        assert_eq!(llm.max_output_tokens, 800);
        assert_eq!(llm.gemini_api_versions, vec!["v1beta", "v1"]);
        assert!(llm.openai_api_key.is_none());
        assert_eq!(llm.timeout(), Duration::from_secs(25));
    }

    #[test]
    fn test_llm_timeout_millis_override() {
        let llm = LlmSettings {
            timeout_ms: Some(150),
            ..Default::default()
        };
        assert_eq!(llm.timeout(), Duration::from_millis(150));
    }

    #[test]
    fn test_default_retrieval() {
        let retrieval = RetrievalSettings::default();
        assert_eq!(retrieval.top_k, 6);
        assert_eq!(retrieval.max_snippet_chars, 320);
        assert_eq!(SynthesisSettings::default().max_context_chars, 8000);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
        assert_eq!(LoggingSettings::default().log_format(), LogFormat::Json);
    }

    #[test]
    fn test_log_format_names() {
        let named = |format: &str| LoggingSettings {
            format: format.to_string(),
            ..Default::default()
        };
        assert_eq!(named("Pretty").log_format(), LogFormat::Pretty);
        assert_eq!(named("compact").log_format(), LogFormat::Compact);
        assert_eq!(named("plain").log_format(), LogFormat::Compact);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings: Settings = Config::builder().build().unwrap().try_deserialize().unwrap();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.vector_store.collection, "schemes");
    }
}

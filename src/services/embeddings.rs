use crate::config::EmbeddingSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Embedding API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("No embedding in response")]
    EmptyResponse,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Turns query text into a vector
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// OpenAI-compatible `/embeddings`
    OpenAi,
    /// Ollama `/api/embeddings`
    Ollama,
}

impl EmbeddingProvider {
    pub fn parse(name: &str) -> Result<Self, EmbeddingError> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Ok(EmbeddingProvider::OpenAi),
            "ollama" => Ok(EmbeddingProvider::Ollama),
            other => Err(EmbeddingError::ConfigError(format!("unknown embedding provider '{}'", other))),
        }
    }
}

/// HTTP client for an embedding service
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl EmbeddingClient {
    pub fn new(settings: &EmbeddingSettings) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            provider: EmbeddingProvider::parse(&settings.provider)?,
            model: settings.model.clone(),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
            client,
        })
    }

    async fn embed_openai(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        #[derive(Serialize)]
        struct OpenAiRequest<'a> {
            input: &'a str,
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAiResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| EmbeddingError::ConfigError("OpenAI embedding API key not provided".to_string()))?;

        let url = format!("{}/embeddings", self.endpoint);
        tracing::debug!("Calling OpenAI embeddings API: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&OpenAiRequest { input: text, model: &self.model })
            .send()
            .await?;

        let response = check_status(response).await?;
        let result: OpenAiResponse = response.json().await?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbeddingError::EmptyResponse)
    }

    async fn embed_ollama(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        tracing::debug!("Calling Ollama embeddings API: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&OllamaRequest { model: &self.model, prompt: text })
            .send()
            .await?;

        let response = check_status(response).await?;
        let result: OllamaResponse = response.json().await?;

        if result.embedding.is_empty() {
            return Err(EmbeddingError::EmptyResponse);
        }
        Ok(result.embedding)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, EmbeddingError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
    Err(EmbeddingError::ApiError { status, body })
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match self.provider {
            EmbeddingProvider::OpenAi => self.embed_openai(text).await,
            EmbeddingProvider::Ollama => self.embed_ollama(text).await,
        }
    }
}

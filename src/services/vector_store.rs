use crate::config::VectorStoreSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;

/// Equality filter on document metadata, e.g. `{"jurisdiction": "Telangana"}`
pub type MetadataFilter = Map<String, Value>;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Vector store returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// One nearest-neighbour hit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredDocument {
    pub id: Option<String>,
    pub document: String,
    pub metadata: Map<String, Value>,
    pub distance: Option<f64>,
}

/// Nearest-neighbour search over scheme documents
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn query(
        &self,
        embedding: &[f32],
        n_results: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<StoredDocument>, VectorStoreError>;

    /// Name of the collection being searched
    fn collection(&self) -> &str;
}

/// Chroma REST client
///
/// The collection id is resolved with get-or-create on first use and cached
/// for the life of the client.
pub struct ChromaClient {
    base_url: String,
    collection: String,
    collection_id: OnceCell<String>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<Map<String, Value>>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f64>>>>,
}

impl ChromaClient {
    pub fn new(settings: &VectorStoreSettings) -> Result<Self, VectorStoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.url.trim_end_matches('/').to_string(),
            collection: settings.collection.clone(),
            collection_id: OnceCell::new(),
            client,
        })
    }

    async fn collection_id(&self) -> Result<&str, VectorStoreError> {
        let id = self
            .collection_id
            .get_or_try_init(|| async {
                let url = format!("{}/api/v1/collections", self.base_url);
                let response = self
                    .client
                    .post(&url)
                    .json(&json!({"name": self.collection, "get_or_create": true}))
                    .send()
                    .await?;

                let response = check_status(response).await?;
                let collection: CollectionResponse = response.json().await?;
                tracing::info!("Resolved collection '{}' to id {}", self.collection, collection.id);
                Ok::<String, VectorStoreError>(collection.id)
            })
            .await?;

        Ok(id.as_str())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, VectorStoreError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
    Err(VectorStoreError::ApiError { status, body })
}

#[async_trait]
impl VectorStore for ChromaClient {
    async fn query(
        &self,
        embedding: &[f32],
        n_results: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<StoredDocument>, VectorStoreError> {
        let collection_id = self.collection_id().await?;
        let url = format!("{}/api/v1/collections/{}/query", self.base_url, collection_id);

        let mut body = json!({
            "query_embeddings": [embedding],
            "n_results": n_results,
            "include": ["metadatas", "distances", "documents"],
        });
        if let Some(filter) = filter {
            body["where"] = Value::Object(filter.clone());
        }

        let response = self.client.post(&url).json(&body).send().await?;
        let response = check_status(response).await?;
        let result: QueryResponse = response
            .json()
            .await
            .map_err(|e| VectorStoreError::InvalidResponse(e.to_string()))?;

        Ok(documents_from_response(result))
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}

/// Flatten Chroma's per-query nested arrays; only the first query is used
fn documents_from_response(response: QueryResponse) -> Vec<StoredDocument> {
    let ids = response.ids.into_iter().next().unwrap_or_default();
    let documents: Vec<Option<String>> = first(response.documents);
    let metadatas: Vec<Option<Map<String, Value>>> = first(response.metadatas);
    let distances: Vec<Option<f64>> = first(response.distances);

    let len = documents.len().max(ids.len());

    (0..len)
        .map(|i| StoredDocument {
            id: ids.get(i).cloned(),
            document: documents.get(i).cloned().flatten().unwrap_or_default(),
            metadata: metadatas.get(i).cloned().flatten().unwrap_or_default(),
            distance: distances.get(i).copied().flatten(),
        })
        .collect()
}

fn first<T>(nested: Option<Vec<Vec<T>>>) -> Vec<T> {
    nested.and_then(|n| n.into_iter().next()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_query_response() {
        let response: QueryResponse = serde_json::from_value(json!({
            "ids": [["a", "b"]],
            "documents": [["doc a", null]],
            "metadatas": [[{"scheme_id": "pm_kisan"}, null]],
            "distances": [[0.1, 0.4]]
        }))
        .unwrap();

        let docs = documents_from_response(response);

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id.as_deref(), Some("a"));
        assert_eq!(docs[0].document, "doc a");
        assert_eq!(docs[0].metadata["scheme_id"], "pm_kisan");
        assert_eq!(docs[1].document, "");
        assert!(docs[1].metadata.is_empty());
        assert_eq!(docs[1].distance, Some(0.4));
    }

    #[test]
    fn test_empty_query_response() {
        let docs = documents_from_response(QueryResponse::default());
        assert!(docs.is_empty());
    }
}

use crate::core::normalizer::normalize_profile;
use crate::core::prompts::truncate_chars;
use crate::models::{Profile, RetrievedChunk};
use crate::services::embeddings::Embedder;
use crate::services::vector_store::{MetadataFilter, StoredDocument, VectorStore};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Query used when the profile carries nothing searchable
pub const GENERAL_QUERY: &str = "general welfare schemes";

/// Semantic retrieval of scheme clauses for a profile
///
/// # Pipeline Stages
/// 1. Canonical query text from the profile
/// 2. Embed the query
/// 3. Nearest documents, filtered by jurisdiction when a state is known
/// 4. Unfiltered retry when the filtered query finds nothing
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
    max_snippet_chars: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>, top_k: usize, max_snippet_chars: usize) -> Self {
        Self {
            embedder,
            store,
            top_k,
            max_snippet_chars,
        }
    }

    pub fn collection(&self) -> &str {
        self.store.collection()
    }

    pub fn max_snippet_chars(&self) -> usize {
        self.max_snippet_chars
    }

    /// Nearest chunks for a query; failures are logged and give no results
    pub async fn retrieve_chunks(&self, query: &str, filter: Option<&MetadataFilter>) -> Vec<RetrievedChunk> {
        if query.is_empty() {
            return Vec::new();
        }

        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::error!("Embedding failed: {}", e);
                return Vec::new();
            }
        };

        match self.store.query(&embedding, self.top_k, filter).await {
            Ok(documents) => documents
                .into_iter()
                .map(|doc| chunk_from_document(doc, self.max_snippet_chars))
                .collect(),
            Err(e) => {
                tracing::error!("Vector store query failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Retrieve chunks for a profile, retrying without the jurisdiction filter
    pub async fn retrieve_for_profile(&self, profile: &Profile) -> Vec<RetrievedChunk> {
        let query = build_query(profile);
        let filter = jurisdiction_filter(profile);

        let chunks = self.retrieve_chunks(&query, filter.as_ref()).await;
        if !chunks.is_empty() || filter.is_none() {
            return chunks;
        }

        tracing::debug!("No chunks with jurisdiction filter, retrying unfiltered");
        self.retrieve_chunks(&query, None).await
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Canonical query text: free-form text wins, else `key:value` parts
pub fn build_query(profile: &Profile) -> String {
    if let Some(text) = non_blank(profile.text.as_deref()) {
        return text.to_string();
    }

    let normalized = normalize_profile(profile);
    let mut parts = Vec::new();

    if let Some(age) = normalized.age.filter(|a| *a != 0) {
        parts.push(format!("age:{}", age));
    }
    if let Some(gender) = non_blank(profile.gender.as_deref()) {
        parts.push(format!("gender:{}", gender));
    }
    if let Some(state) = non_blank(profile.resident_state()) {
        parts.push(format!("state:{}", state));
    }
    if let Some(occupation) = non_blank(profile.occupation.as_deref()) {
        parts.push(format!("occupation:{}", occupation));
    }
    if let Some(income) = normalized.income {
        parts.push(format!("income:{}", income));
    }

    if parts.is_empty() {
        GENERAL_QUERY.to_string()
    } else {
        parts.join(" | ")
    }
}

/// `{jurisdiction: <state>}` when the profile names a state
pub fn jurisdiction_filter(profile: &Profile) -> Option<MetadataFilter> {
    let state = non_blank(profile.resident_state())?;
    let mut filter = Map::new();
    filter.insert("jurisdiction".to_string(), Value::String(state.to_string()));
    Some(filter)
}

fn metadata_string(metadata: &Map<String, Value>, key: &str) -> Option<String> {
    match metadata.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn chunk_from_document(doc: StoredDocument, max_snippet_chars: usize) -> RetrievedChunk {
    let page_no = match doc.metadata.get("page_no") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };

    RetrievedChunk {
        text: truncate_chars(&doc.document, max_snippet_chars),
        scheme_id: metadata_string(&doc.metadata, "scheme_id"),
        title: metadata_string(&doc.metadata, "title"),
        url: metadata_string(&doc.metadata, "source_url"),
        page_no,
        score: doc.distance,
        id: doc.id,
        full_text: doc.document,
    }
}

// Service exports
pub mod embeddings;
pub mod llm;
pub mod retriever;
pub mod synthesizer;
pub mod vector_store;

pub use embeddings::{Embedder, EmbeddingClient, EmbeddingError, EmbeddingProvider};
pub use llm::{EndpointStrategy, LlmClient, LlmError, LlmProvider};
pub use retriever::Retriever;
pub use synthesizer::Synthesizer;
pub use vector_store::{ChromaClient, MetadataFilter, StoredDocument, VectorStore, VectorStoreError};

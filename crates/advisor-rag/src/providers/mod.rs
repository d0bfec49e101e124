//! Provider abstractions for embeddings, generation, and vector search
//!
//! Trait seams keep the pipeline independent of the concrete backends
//! (Ollama for embeddings/generation, Qdrant for vector search) and let
//! tests substitute in-memory fakes.

pub mod embedding;
pub mod llm;
pub mod ollama;
pub mod qdrant;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use vector_store::{SearchHit, VectorSearchProvider};

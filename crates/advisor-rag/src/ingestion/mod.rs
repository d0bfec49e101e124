//! Document ingestion into the vector collection

pub mod chunker;

pub use chunker::TextChunker;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, VectorSearchProvider};

/// A raw document submitted for ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Document text
    pub content: String,
    /// Company the document describes
    #[serde(default)]
    pub company: Option<String>,
    /// Kind of document (FAQ, internship listing, college doc, ...)
    #[serde(default)]
    pub document_type: Option<String>,
    /// Where the document came from
    #[serde(default)]
    pub source: Option<String>,
}

/// Chunks, embeds, and indexes raw documents
pub struct DocumentIngestor {
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    search: Arc<dyn VectorSearchProvider>,
}

impl DocumentIngestor {
    /// Create an ingestor over the given providers
    pub fn new(
        chunking: &ChunkingConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        search: Arc<dyn VectorSearchProvider>,
    ) -> Self {
        Self {
            chunker: TextChunker::new(chunking),
            embedder,
            search,
        }
    }

    /// Ingest one document; returns the number of chunks stored
    pub async fn ingest(&self, document: &SourceDocument) -> Result<usize> {
        let chunks = self.chunker.chunk(&document.content);
        let ingested_at = chrono::Utc::now().to_rfc3339();

        for chunk in &chunks {
            let vector = self.embedder.embed(chunk).await?;

            let mut payload = BTreeMap::new();
            payload.insert("content".to_string(), chunk.clone());
            payload.insert(
                "company".to_string(),
                document.company.clone().unwrap_or_else(|| "Unknown".to_string()),
            );
            payload.insert(
                "document_type".to_string(),
                document
                    .document_type
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
            );
            payload.insert(
                "source".to_string(),
                document.source.clone().unwrap_or_else(|| "Unknown".to_string()),
            );
            payload.insert("ingested_at".to_string(), ingested_at.clone());

            let id = Uuid::new_v4().to_string();
            self.search.upsert(&id, vector, payload).await?;
        }

        tracing::info!(chunks = chunks.len(), "document ingested");
        Ok(chunks.len())
    }
}

//! Vector search provider trait for similarity search and point upsert

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;

/// Single hit from a payload-only similarity search
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Similarity score (higher is more relevant)
    pub score: f32,
    /// Stored payload, including the `content` field
    pub payload: BTreeMap<String, String>,
}

/// Trait for k-nearest-neighbor search against a named collection
#[async_trait]
pub trait VectorSearchProvider: Send + Sync {
    /// Search for the `top_k` nearest points, optionally restricted by a
    /// conjunction of exact-match payload conditions
    async fn search(
        &self,
        query_vector: &[f32],
        top_k: usize,
        filter: Option<&BTreeMap<String, String>>,
    ) -> Result<Vec<SearchHit>>;

    /// Insert or replace a single point
    async fn upsert(
        &self,
        id: &str,
        vector: Vec<f32>,
        payload: BTreeMap<String, String>,
    ) -> Result<()>;

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

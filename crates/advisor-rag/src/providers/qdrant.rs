//! Qdrant-backed vector search provider

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    value::Kind, Condition, Filter, PointStruct, QueryPointsBuilder, UpsertPointsBuilder, Value,
};
use qdrant_client::{Payload, Qdrant};

use crate::config::QdrantConfig;
use crate::error::{Error, Result};

use super::vector_store::{SearchHit, VectorSearchProvider};

/// Similarity search and upsert against a named Qdrant collection
pub struct QdrantSearch {
    client: Qdrant,
    collection: String,
}

impl QdrantSearch {
    /// Create a new client for the configured collection
    pub fn new(config: &QdrantConfig) -> Result<Self> {
        let mut builder =
            Qdrant::from_url(&config.url).timeout(Duration::from_secs(config.timeout_secs));

        if let Some(api_key) = &config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| Error::vector_db(format!("Failed to create Qdrant client: {}", e)))?;

        tracing::info!(collection = %config.collection, "Qdrant search provider initialized");

        Ok(Self {
            client,
            collection: config.collection.clone(),
        })
    }

    /// Render a payload value as a string for the flat metadata map
    fn value_to_string(value: &Value) -> String {
        match &value.kind {
            Some(Kind::StringValue(s)) => s.clone(),
            Some(Kind::IntegerValue(i)) => i.to_string(),
            Some(Kind::DoubleValue(d)) => d.to_string(),
            Some(Kind::BoolValue(b)) => b.to_string(),
            _ => String::new(),
        }
    }
}

#[async_trait]
impl VectorSearchProvider for QdrantSearch {
    async fn search(
        &self,
        query_vector: &[f32],
        top_k: usize,
        filter: Option<&BTreeMap<String, String>>,
    ) -> Result<Vec<SearchHit>> {
        let mut request = QueryPointsBuilder::new(self.collection.clone())
            .query(query_vector.to_vec())
            .limit(top_k as u64)
            .with_payload(true);

        if let Some(conditions) = filter {
            let must: Vec<Condition> = conditions
                .iter()
                .map(|(field, value)| Condition::matches(field.as_str(), value.clone()))
                .collect();
            request = request.filter(Filter::must(must));
        }

        let response = self
            .client
            .query(request)
            .await
            .map_err(|e| Error::vector_db(format!("Similarity search failed: {}", e)))?;

        let hits = response
            .result
            .into_iter()
            .map(|point| {
                let payload = point
                    .payload
                    .iter()
                    .map(|(key, value)| (key.clone(), Self::value_to_string(value)))
                    .collect();
                SearchHit {
                    score: point.score,
                    payload,
                }
            })
            .collect();

        Ok(hits)
    }

    async fn upsert(
        &self,
        id: &str,
        vector: Vec<f32>,
        payload: BTreeMap<String, String>,
    ) -> Result<()> {
        let mut fields = serde_json::Map::new();
        for (key, value) in payload {
            fields.insert(key, serde_json::Value::String(value));
        }
        let payload = Payload::try_from(serde_json::Value::Object(fields))
            .map_err(|e| Error::vector_db(format!("Invalid payload: {}", e)))?;

        let point = PointStruct::new(id.to_string(), vector, payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true))
            .await
            .map_err(|e| Error::vector_db(format!("Upsert failed: {}", e)))?;

        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.client.health_check().await.is_ok())
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}

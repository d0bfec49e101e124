//! Configuration for the chatbot service
//!
//! Defaults mirror the production deployment; every field can be overridden
//! from the environment (a `.env` file is honored when present).

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Answer returned when generation fails
const DEFAULT_FALLBACK_RESPONSE: &str = "Based on generally available information about internships and education programs, I can provide some guidance. However, specific details for this query are not in my current database. Please feel free to ask about general aspects or other companies/programs.";

/// Main chatbot service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Qdrant vector store configuration
    pub qdrant: QdrantConfig,
    /// Embedding configuration
    pub embedding: EmbeddingConfig,
    /// LLM configuration
    pub llm: LlmConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Document chunking configuration
    pub chunking: ChunkingConfig,
    /// Conversation session configuration
    pub session: SessionConfig,
    /// SSE streaming configuration
    pub streaming: StreamingConfig,
    /// Answer returned when generation fails
    pub fallback_response: String,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            qdrant: QdrantConfig::default(),
            embedding: EmbeddingConfig::default(),
            llm: LlmConfig::default(),
            retrieval: RetrievalConfig::default(),
            chunking: ChunkingConfig::default(),
            session: SessionConfig::default(),
            streaming: StreamingConfig::default(),
            fallback_response: DEFAULT_FALLBACK_RESPONSE.to_string(),
        }
    }
}

impl ChatbotConfig {
    /// Load configuration from the environment, reading `.env` if present
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            server: ServerConfig {
                host: env_or("CHATBOT_SERVICE_HOST", "0.0.0.0"),
                port: env_parse("CHATBOT_SERVICE_PORT", 5001),
            },
            qdrant: QdrantConfig {
                url: env_or("QDRANT_URL", "http://localhost:6334"),
                api_key: env::var("QDRANT_API_KEY").ok().filter(|k| !k.is_empty()),
                collection: env_or("QDRANT_COLLECTION", "internship_education_db"),
                timeout_secs: env_parse("QDRANT_TIMEOUT_SECS", 10),
            },
            embedding: EmbeddingConfig {
                model: env_or("EMBEDDING_MODEL", "nomic-embed-text"),
                dimensions: env_parse("EMBEDDING_DIMENSION", 768),
            },
            llm: LlmConfig {
                base_url: env_or("OLLAMA_URL", "http://localhost:11434"),
                model: env_or("GENERATION_MODEL", "llama3.2:3b"),
                temperature: env_parse("GENERATION_TEMPERATURE", 0.3),
                timeout_secs: env_parse("GENERATION_TIMEOUT_SECS", 60),
                max_retries: env_parse("GENERATION_MAX_RETRIES", 2),
            },
            retrieval: RetrievalConfig {
                top_k: env_parse("TOP_K_RESULTS", 5),
                similarity_threshold: env_parse("SIMILARITY_THRESHOLD", 0.50),
            },
            chunking: ChunkingConfig {
                chunk_size: env_parse("CHUNK_SIZE", 500),
                chunk_overlap: env_parse("CHUNK_OVERLAP", 50),
            },
            session: SessionConfig {
                max_history: env_parse("MAX_CONVERSATION_HISTORY", 10),
            },
            streaming: StreamingConfig {
                chunk_budget: env_parse("STREAM_CHUNK_SIZE", 30),
                pacing_ms: env_parse("STREAM_PACING_MS", 10),
            },
            fallback_response: env_or("FALLBACK_RESPONSE", DEFAULT_FALLBACK_RESPONSE),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

/// Qdrant vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// Qdrant server URL (gRPC endpoint)
    pub url: String,
    /// API key for Qdrant Cloud (None for a local instance)
    pub api_key: Option<String>,
    /// Collection holding the company/FAQ/college documents
    pub collection: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            collection: "internship_education_db".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            temperature: 0.3,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents to retrieve per query
    pub top_k: usize,
    /// Minimum similarity score for a hit to be kept
    pub similarity_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            similarity_threshold: 0.50,
        }
    }
}

/// Text chunking configuration for document ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// Conversation session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of turns kept per session
    pub max_history: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_history: 10 }
    }
}

/// SSE streaming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Maximum characters per streamed chunk
    pub chunk_budget: usize,
    /// Delay between chunk events in milliseconds (0 disables pacing)
    pub pacing_ms: u64,
}

impl StreamingConfig {
    /// Pacing delay as a duration
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_budget: 30,
            pacing_ms: 10,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment_constants() {
        let config = ChatbotConfig::default();
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.session.max_history, 10);
        assert_eq!(config.qdrant.collection, "internship_education_db");
        assert_eq!(config.streaming.chunk_budget, 30);
        assert!(!config.fallback_response.is_empty());
    }

    #[test]
    fn zero_pacing_disables_the_delay() {
        let streaming = StreamingConfig {
            chunk_budget: 30,
            pacing_ms: 0,
        };
        assert!(streaming.pacing().is_zero());
    }
}

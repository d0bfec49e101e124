//! advisor-rag: intent-routed RAG chatbot for internship and education questions
//!
//! Classifies query intent, routes between a retrieval-augmented pipeline
//! backed by a Qdrant document collection and an external-knowledge pipeline,
//! and streams generated answers to clients over SSE.

pub mod chatbot;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod resume;
pub mod retrieval;
pub mod routing;
pub mod server;
pub mod session;
pub mod streaming;

pub use chatbot::RagChatbot;
pub use config::ChatbotConfig;
pub use error::{Error, Result};

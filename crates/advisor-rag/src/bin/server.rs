//! Chatbot service binary
//!
//! Run with: cargo run -p advisor-rag --bin advisor-rag-server

use advisor_rag::{config::ChatbotConfig, server::ChatbotServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "advisor_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ChatbotConfig::from_env();

    tracing::info!("Configuration loaded");
    tracing::info!("  - Qdrant collection: {}", config.qdrant.collection);
    tracing::info!("  - Embedding model: {}", config.embedding.model);
    tracing::info!("  - Generation model: {}", config.llm.model);
    tracing::info!("  - Top-k: {}", config.retrieval.top_k);

    let server = ChatbotServer::new(config);

    println!("\nChatbot service starting...");
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /query        - Ask a question (JSON response)");
    println!("  POST /query-stream - Ask a question (SSE stream)");
    println!("  POST /clear        - Clear a conversation session");
    println!("  POST /ingest       - Index documents into the collection");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}

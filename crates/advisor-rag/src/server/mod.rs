//! HTTP server for the chatbot service

pub mod routes;
pub mod state;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ChatbotConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Chatbot HTTP server
pub struct ChatbotServer {
    config: ChatbotConfig,
    state: AppState,
}

impl ChatbotServer {
    /// Create a new server
    pub fn new(config: ChatbotConfig) -> Self {
        let state = AppState::new(config.clone());
        Self { config, state }
    }

    /// Start the server: build the pipeline, warm it, then serve.
    /// Construction and warm-up failures are logged but never prevent
    /// serving; /health reports the honest state.
    pub async fn start(self) -> Result<()> {
        match self.state.chatbot() {
            Ok(_) => tracing::info!("chatbot initialized"),
            Err(e) => {
                tracing::warn!(error = %e, "chatbot initialization failed, will retry on first request")
            }
        }
        self.state.warm_up().await;

        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = router(self.state.clone());

        tracing::info!("Starting chatbot service on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the full router over the given state
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(routes::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Response body for /health
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    chatbot_initialized: bool,
    pipeline_warmed: bool,
}

/// GET /health - liveness plus pipeline state
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        chatbot_initialized: state.chatbot_initialized(),
        pipeline_warmed: state.pipeline_warmed(),
    })
}

//! API routes for the chatbot service

pub mod ingest;
pub mod query;
pub mod session;

use axum::{routing::post, Router};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/query", post(query::query))
        .route("/query-stream", post(query::query_stream))
        .route("/clear", post(session::clear_session))
        .route("/ingest", post(ingest::ingest_documents))
}

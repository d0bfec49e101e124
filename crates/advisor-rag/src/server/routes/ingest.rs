//! Document ingestion endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ingestion::SourceDocument;
use crate::server::state::AppState;

/// Request body for /ingest
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub documents: Vec<SourceDocument>,
}

/// Response body for /ingest
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub documents: usize,
    pub chunks: usize,
}

/// POST /ingest - chunk, embed, and index raw documents
pub async fn ingest_documents(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>> {
    if request.documents.is_empty() {
        return Err(Error::validation("documents are required"));
    }

    for document in &request.documents {
        if document.content.trim().is_empty() {
            return Err(Error::validation("document content is required"));
        }
    }

    let chatbot = state.chatbot()?;

    let mut chunks = 0;
    for document in &request.documents {
        chunks += chatbot.ingestor().ingest(document).await?;
    }

    tracing::info!(
        documents = request.documents.len(),
        chunks,
        "ingest request completed"
    );

    Ok(Json(IngestResponse {
        success: true,
        documents: request.documents.len(),
        chunks,
    }))
}

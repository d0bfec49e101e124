//! Session management endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::server::state::AppState;

/// Request body for /clear
#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body for /clear
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

/// POST /clear - drop the conversation history for one session
pub async fn clear_session(
    State(state): State<AppState>,
    Json(request): Json<ClearRequest>,
) -> Result<Json<ClearResponse>> {
    let user_id = request.user_id.as_deref().unwrap_or("").trim();
    let session_id = request.session_id.as_deref().unwrap_or("").trim();

    if user_id.is_empty() || session_id.is_empty() {
        return Err(Error::validation("user_id and session_id are required"));
    }

    let chatbot = state.chatbot()?;
    chatbot.clear_session(user_id, session_id);

    Ok(Json(ClearResponse {
        success: true,
        message: "Session cleared".to_string(),
    }))
}

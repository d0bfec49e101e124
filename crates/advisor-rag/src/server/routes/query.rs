//! Query endpoints: JSON answers and SSE streaming

use axum::{
    extract::State,
    http::HeaderValue,
    response::{sse::Event, IntoResponse, Response, Sse},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::streaming::{chunk_text, StreamEvent};

/// Request body shared by /query and /query-stream
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

impl QueryRequest {
    /// Reject missing or blank fields before any pipeline work happens
    fn validate(&self) -> Result<(String, String, String)> {
        let user_id = self.user_id.as_deref().unwrap_or("").trim();
        let session_id = self.session_id.as_deref().unwrap_or("").trim();

        if user_id.is_empty() || session_id.is_empty() {
            return Err(Error::validation("user_id and session_id are required"));
        }

        let query = self.query.as_deref().unwrap_or("").trim();
        if query.is_empty() {
            return Err(Error::validation("query is required"));
        }

        Ok((
            user_id.to_string(),
            session_id.to_string(),
            query.to_string(),
        ))
    }
}

/// Response body for /query
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub success: bool,
    pub response: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// POST /query - answer a query and return the full response as JSON
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let (user_id, session_id, query_text) = request.validate()?;

    let chatbot = state.chatbot()?;

    tracing::info!(user = %user_id, session = %session_id, "handling query");
    let answer = chatbot.answer(&query_text, &user_id, &session_id).await;

    Ok(Json(QueryResponse {
        success: true,
        response: answer,
        session_id,
    }))
}

/// POST /query-stream - answer a query as a paced SSE event stream
///
/// Validation errors are returned as a JSON 400 before any headers commit;
/// afterwards every outcome is delivered as stream events.
pub async fn query_stream(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Response> {
    let (user_id, session_id, query_text) = request.validate()?;

    let (tx, rx) = mpsc::channel::<StreamEvent>(16);
    tokio::spawn(deliver(state, query_text, user_id, session_id, tx));

    let stream = ReceiverStream::new(rx).filter_map(|event| {
        serde_json::to_string(&event)
            .ok()
            .map(|data| Ok::<_, std::convert::Infallible>(Event::default().data(data)))
    });

    let mut response = Sse::new(stream).into_response();
    response
        .headers_mut()
        .insert("x-accel-buffering", HeaderValue::from_static("no"));
    Ok(response)
}

/// Produce the event sequence for one streamed request: `start`, the chunked
/// answer, then a terminal `done` or `error`. A closed channel means the
/// client went away, so delivery stops instead of pacing into the void.
async fn deliver(
    state: AppState,
    query: String,
    user_id: String,
    session_id: String,
    tx: mpsc::Sender<StreamEvent>,
) {
    if tx.send(StreamEvent::Start).await.is_err() {
        return;
    }

    let chatbot = match state.chatbot() {
        Ok(chatbot) => chatbot,
        Err(e) => {
            tracing::error!(error = %e, "chatbot construction failed during stream");
            let _ = tx
                .send(StreamEvent::Error {
                    error: e.to_string(),
                })
                .await;
            return;
        }
    };

    let answer = chatbot.answer(&query, &user_id, &session_id).await;

    let pacing = state.config().streaming.pacing();
    for content in chunk_text(&answer, state.config().streaming.chunk_budget) {
        if tx.send(StreamEvent::Chunk { content }).await.is_err() {
            tracing::debug!("client disconnected mid-stream, stopping delivery");
            return;
        }
        if !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
    }

    let _ = tx.send(StreamEvent::Done).await;
}

use crate::convert::{convert_messages, last_user_text, ClientMessage};
use crate::server::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::TryStreamExt;
use serde::Deserialize;
use std::sync::Arc;
use toolstream_agent::{DATA_STREAM_HEADER, DATA_STREAM_VERSION};
use toolstream_core::{ChatMessage, ToolstreamError, ToolstreamResult};
use tracing::{error, info, warn};

/// Prefix of the message carrying retrieval results into the chat.
pub const RAG_RESULT_PREFIX: &str = "Result from RAG search => \n";

/// Instruction appended after retrieval results.
pub const RAG_CITATION_NOTE: &str = "Please mention the precise pages when using these results \
     (the document ID doesn't matter, since it's from the same book)";

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ClientMessage>,
    /// Run the research agent on the latest user message first.
    #[serde(default)]
    pub research: bool,
    /// Run a similarity search on the latest user message first.
    #[serde(default)]
    pub rag: bool,
}

/// Error response for failures before streaming starts.
pub struct ApiError(ToolstreamError);

impl From<ToolstreamError> for ApiError {
    fn from(e: ToolstreamError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ToolstreamError::Gateway(_) => StatusCode::BAD_REQUEST,
            ToolstreamError::Http(_) | ToolstreamError::Upstream(_) | ToolstreamError::Agent(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!(status = %status, error = %self.0, "Chat request failed");
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub(crate) async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    info!(
        messages = request.messages.len(),
        research = request.research,
        rag = request.rag,
        "Chat request"
    );

    let mut messages = convert_messages(&request.messages);
    if request.research || request.rag {
        let query = last_user_text(&request.messages)
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| ToolstreamError::Gateway("No user message to use as a query".into()))?;
        if request.research {
            state.bridge.orchestrator().augment(query, &mut messages).await?;
        }
        if request.rag {
            augment_with_retrieval(&state, query, &mut messages).await?;
        }
    }

    let lines = state
        .bridge
        .stream_chat(messages)
        .await?
        .inspect_err(|e| warn!(error = %e, "Aborting chat stream"));

    let mut response = Body::from_stream(lines).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(DATA_STREAM_HEADER, HeaderValue::from_static(DATA_STREAM_VERSION));
    Ok(response)
}

async fn augment_with_retrieval(
    state: &AppState,
    query: &str,
    messages: &mut Vec<ChatMessage>,
) -> ToolstreamResult<()> {
    let retrieval = state
        .retrieval
        .as_ref()
        .ok_or_else(|| ToolstreamError::Gateway("Retrieval is not configured".into()))?;

    let passages = retrieval.search(query, retrieval.default_k()).await?;
    info!(hits = passages.len(), "Retrieval augmentation");
    messages.push(ChatMessage::user(format!(
        "{RAG_RESULT_PREFIX}{}",
        serde_json::to_string(&passages)?
    )));
    messages.push(ChatMessage::developer(RAG_CITATION_NOTE));
    Ok(())
}

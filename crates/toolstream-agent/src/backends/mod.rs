pub mod openai;

use crate::chunk::ChatChunk;
use crate::responses::{InputItem, ReasoningResponse, ReasoningTool};
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use toolstream_core::{ChatMessage, ToolstreamResult};
use toolstream_tools::ToolSpec;

/// Incremental chunks from a streaming chat completion.
pub type ChunkStream = BoxStream<'static, ToolstreamResult<ChatChunk>>;

/// A streaming chat-completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSpec>,
    pub temperature: Option<f32>,
}

/// A single reasoning-endpoint request.
#[derive(Debug, Clone)]
pub struct ReasoningRequest {
    pub model: String,
    pub instructions: String,
    pub input: Vec<InputItem>,
    /// Continuation handle from the previous response, if any.
    pub previous_response_id: Option<String>,
    pub tools: Vec<ReasoningTool>,
    pub reasoning_summary: Option<String>,
}

/// Streaming chat-completion endpoint.
///
/// Returning `Ok` means the upstream accepted the request; failures after that
/// arrive as `Err` items on the stream.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn stream_chat(&self, request: CompletionRequest) -> ToolstreamResult<ChunkStream>;
}

/// Stateful reasoning endpoint that keeps conversation state server-side,
/// addressed by the response id.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    async fn respond(&self, request: ReasoningRequest) -> ToolstreamResult<ReasoningResponse>;
}

//! Streaming bridge and research agent for toolstream.
//!
//! [`StreamTranslator`] turns an upstream chat-completion stream into AI SDK
//! data-stream lines, running tool calls inline. [`AgentOrchestrator`] drives
//! the research loop against a stateful reasoning endpoint. [`Bridge`] holds
//! the upstream clients, registry and config they share.

pub mod backends;
pub mod bridge;
pub mod chunk;
pub mod config;
pub mod orchestrator;
pub mod protocol;
pub mod responses;
pub mod translator;

pub use backends::openai::OpenAiBackend;
pub use backends::{
    ChunkStream, CompletionBackend, CompletionRequest, ReasoningBackend, ReasoningRequest,
};
pub use bridge::{Bridge, LineStream};
pub use chunk::{ChatChunk, ChunkChoice, ChunkDelta, FunctionDelta, ToolCallDelta, Usage};
pub use config::{BridgeConfig, ChatConfig, LlmProvider, ModelConfig, ResearchConfig};
pub use orchestrator::{research_instructions, AgentOrchestrator, AgentTurn, RESEARCH_RESULT_PREFIX};
pub use protocol::{FinishReason, StreamPart, DATA_STREAM_HEADER, DATA_STREAM_VERSION};
pub use responses::{InputItem, OutputContent, OutputItem, ReasoningResponse, ReasoningTool};
pub use translator::{DraftToolCall, DraftToolCalls, StreamTranslator};

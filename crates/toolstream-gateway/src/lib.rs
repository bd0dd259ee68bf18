//! HTTP gateway for toolstream.
//!
//! `POST /api/chat` accepts AI SDK `useChat` history and answers with a
//! data-stream protocol body; `GET /health` is a liveness probe.

pub mod chat;
pub mod convert;
pub mod middleware;
pub mod server;

pub use chat::{ApiError, ChatRequest, RAG_CITATION_NOTE, RAG_RESULT_PREFIX};
pub use convert::{convert_messages, ClientAttachment, ClientMessage, ToolInvocation, ToolInvocationState};
pub use server::{AppState, GatewayServer};

//! Core types and error definitions for toolstream.
//!
//! This crate provides the foundational types shared across all toolstream crates:
//! the unified error enum, the upstream chat message model, and the tool call
//! abstractions passed between the stream translator, the agent orchestrator and
//! the tool registry.
//!
//! # Main types
//!
//! - [`ToolstreamError`] — Unified error enum for all toolstream subsystems.
//! - [`ToolstreamResult`] — Convenience alias for `Result<T, ToolstreamError>`.
//! - [`Role`] — Message role (system, developer, user, assistant, tool).
//! - [`ChatMessage`] — A single turn in the upstream chat-completions format.
//! - [`ToolCall`] — A fully assembled tool invocation requested by the model.
//! - [`ToolResult`] — The outcome of dispatching a [`ToolCall`].

/// Error enum and result alias.
pub mod error;
/// Upstream chat message model.
pub mod message;
/// Tool call and tool result types.
pub mod tool;

pub use error::{ToolstreamError, ToolstreamResult};
pub use message::{ChatMessage, ContentPart, FunctionCall, ImageUrl, MessageContent, MessageToolCall, Role};
pub use tool::{ToolCall, ToolResult};

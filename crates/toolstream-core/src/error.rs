use thiserror::Error;

/// A convenience `Result` alias using [`ToolstreamError`].
pub type ToolstreamResult<T> = Result<T, ToolstreamError>;

/// Top-level error type for toolstream.
///
/// Each variant corresponds to a subsystem that can produce errors. Tool
/// failures are normally folded into a [`crate::ToolResult`] rather than raised;
/// only [`ToolstreamError::UnknownTool`] escapes the dispatcher.
#[derive(Error, Debug)]
pub enum ToolstreamError {
    /// An error originating from the agent orchestration loop.
    #[error("Agent error: {0}")]
    Agent(String),

    /// A transport-level failure talking to an upstream service.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The upstream service answered, but with an error status or an unusable body.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error raised by a tool capability during invocation.
    #[error("Tool error: {0}")]
    Tool(String),

    /// The model asked for a tool that has no registered capability.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// An error from the HTTP gateway layer.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// An error from the retrieval store or embedding provider.
    #[error("Memory error: {0}")]
    Memory(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

use serde::{Deserialize, Serialize};

/// A fully assembled request from the model to invoke a tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCall {
    /// Identifier assigned by the model for this call.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// Arguments exactly as the model produced them (JSON text, unvalidated).
    pub arguments: String,
}

impl ToolCall {
    /// Creates a tool call.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// The outcome of dispatching a [`ToolCall`].
///
/// On success `content` holds the serialized JSON value returned by the tool.
/// On failure it holds the human-readable error text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolResult {
    /// The ID of the [`ToolCall`] this result corresponds to.
    pub call_id: String,
    /// Serialized result or error description.
    pub content: String,
    /// Whether the tool execution ended in an error.
    pub is_error: bool,
}

impl ToolResult {
    /// Creates a successful tool result from already-serialized JSON.
    pub fn success(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    /// Creates an error tool result.
    pub fn error(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: true,
        }
    }

    /// The result as a JSON fragment: the value itself on success, the error
    /// text encoded as a JSON string on failure.
    pub fn to_json(&self) -> String {
        if self.is_error {
            serde_json::Value::String(self.content.clone()).to_string()
        } else {
            self.content.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("call_1", "{\"temp\":20}");
        assert!(!result.is_error);
        assert_eq!(result.to_json(), "{\"temp\":20}");
    }

    #[test]
    fn test_tool_result_error_is_json_string() {
        let result = ToolResult::error("call_1", "bad \"input\"");
        assert!(result.is_error);
        assert_eq!(result.to_json(), "\"bad \\\"input\\\"\"");
    }
}

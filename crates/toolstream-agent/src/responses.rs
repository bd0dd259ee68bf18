//! Stateful reasoning-endpoint types (OpenAI Responses API shape).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use toolstream_core::{Role, ToolCall};
use toolstream_tools::ToolSpec;

/// An item sent as reasoning-endpoint input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    Message { role: Role, content: String },
    /// The result of a tool call the previous response requested.
    FunctionCallOutput { call_id: String, output: String },
}

impl InputItem {
    pub fn user(content: impl Into<String>) -> Self {
        InputItem::Message {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn tool_output(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        InputItem::FunctionCallOutput {
            call_id: call_id.into(),
            output: output.into(),
        }
    }
}

/// A tool offered to the reasoning model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReasoningTool {
    /// Provider-hosted web search; executed upstream, never dispatched locally.
    WebSearchPreview,
    Function {
        name: String,
        description: String,
        parameters: Value,
        strict: bool,
    },
}

impl From<ToolSpec> for ReasoningTool {
    fn from(spec: ToolSpec) -> Self {
        ReasoningTool::Function {
            name: spec.name,
            description: spec.description,
            parameters: spec.parameters_schema,
            strict: true,
        }
    }
}

/// A reasoning-endpoint response. `id` is the continuation handle for the
/// next request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReasoningResponse {
    pub id: String,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    FunctionCall {
        call_id: String,
        name: String,
        #[serde(default)]
        arguments: String,
    },
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    /// Reasoning summaries, hosted tool activity and anything newer.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    OutputText { text: String },
    #[serde(other)]
    Other,
}

impl ReasoningResponse {
    /// Function calls requested by this response, in output order.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::FunctionCall {
                    call_id,
                    name,
                    arguments,
                } => Some(ToolCall::new(call_id, name, arguments)),
                _ => None,
            })
            .collect()
    }

    /// Concatenated text of every output message.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                _ => None,
            })
            .flatten()
            .filter_map(|part| match part {
                OutputContent::OutputText { text } => Some(text.as_str()),
                OutputContent::Other => None,
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_mixed_output() {
        let raw = json!({
            "id": "resp_1",
            "object": "response",
            "output": [
                {"type": "reasoning", "id": "rs_1", "summary": []},
                {"type": "web_search_call", "id": "ws_1", "status": "completed"},
                {"type": "function_call", "id": "fc_1", "call_id": "call_1",
                 "name": "similarity_search_pdf", "arguments": "{\"query\":\"tudors\"}",
                 "status": "completed"},
                {"type": "message", "id": "msg_1", "role": "assistant",
                 "content": [{"type": "output_text", "text": "Part one. ", "annotations": []},
                             {"type": "output_text", "text": "Part two."}]}
            ]
        });
        let response: ReasoningResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.id, "resp_1");
        assert_eq!(
            response.tool_calls(),
            vec![ToolCall::new("call_1", "similarity_search_pdf", "{\"query\":\"tudors\"}")]
        );
        assert_eq!(response.output_text(), "Part one. Part two.");
    }

    #[test]
    fn test_serialize_input_items() {
        let items = vec![InputItem::user("hi"), InputItem::tool_output("call_1", "[]")];
        assert_eq!(
            serde_json::to_value(&items).unwrap(),
            json!([
                {"type": "message", "role": "user", "content": "hi"},
                {"type": "function_call_output", "call_id": "call_1", "output": "[]"}
            ])
        );
    }

    #[test]
    fn test_serialize_tools() {
        let tools = vec![
            ReasoningTool::WebSearchPreview,
            ReasoningTool::from(ToolSpec::new("lookup", "Look up", json!({"type": "object"}))),
        ];
        assert_eq!(
            serde_json::to_value(&tools).unwrap(),
            json!([
                {"type": "web_search_preview"},
                {"type": "function", "name": "lookup", "description": "Look up",
                 "parameters": {"type": "object"}, "strict": true}
            ])
        );
    }
}

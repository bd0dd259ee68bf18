//! Upstream chat-completion stream chunks.
//!
//! Mirrors the OpenAI `chat.completion.chunk` object closely enough to
//! deserialize it from any compatible provider. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// One incremental message from the completion stream.
///
/// A chunk with an empty `choices` list is the terminal usage summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

/// A piece of a tool call. The first fragment of a call carries its `id` and
/// function name; later fragments carry only argument text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionDelta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

/// Token usage reported in the terminal chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

impl Usage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }
}

impl ChatChunk {
    fn single(delta: ChunkDelta, finish_reason: Option<String>) -> Self {
        Self {
            choices: vec![ChunkChoice {
                index: 0,
                delta,
                finish_reason,
            }],
            usage: None,
        }
    }

    /// A content delta.
    pub fn text(content: impl Into<String>) -> Self {
        Self::single(
            ChunkDelta {
                content: Some(content.into()),
                ..Default::default()
            },
            None,
        )
    }

    /// The opening fragment of a tool call.
    pub fn tool_open(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::single(
            ChunkDelta {
                tool_calls: Some(vec![ToolCallDelta {
                    index: 0,
                    id: Some(id.into()),
                    function: Some(FunctionDelta {
                        name: Some(name.into()),
                        arguments: Some(String::new()),
                    }),
                }]),
                ..Default::default()
            },
            None,
        )
    }

    /// A continuation fragment carrying argument text.
    pub fn tool_args(fragment: impl Into<String>) -> Self {
        Self::single(
            ChunkDelta {
                tool_calls: Some(vec![ToolCallDelta {
                    index: 0,
                    id: None,
                    function: Some(FunctionDelta {
                        name: None,
                        arguments: Some(fragment.into()),
                    }),
                }]),
                ..Default::default()
            },
            None,
        )
    }

    /// A chunk whose only choice carries a finish reason.
    pub fn finish(reason: impl Into<String>) -> Self {
        Self::single(ChunkDelta::default(), Some(reason.into()))
    }

    /// The terminal usage chunk.
    pub fn usage(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            choices: Vec::new(),
            usage: Some(Usage::new(prompt_tokens, completion_tokens)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_openai_tool_chunk() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion.chunk",
            "choices": [{
                "index": 0,
                "delta": {"tool_calls": [{"index": 0, "id": "call_1", "type": "function",
                          "function": {"name": "get_current_weather", "arguments": ""}}]},
                "logprobs": null,
                "finish_reason": null
            }]
        }"#;
        let chunk: ChatChunk = serde_json::from_str(raw).unwrap();
        let fragment = &chunk.choices[0].delta.tool_calls.as_ref().unwrap()[0];
        assert_eq!(fragment.id.as_deref(), Some("call_1"));
        assert_eq!(
            fragment.function.as_ref().unwrap().name.as_deref(),
            Some("get_current_weather")
        );
        assert!(chunk.usage.is_none());
    }

    #[test]
    fn test_deserialize_usage_chunk() {
        let raw = r#"{"choices": [], "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}}"#;
        let chunk: ChatChunk = serde_json::from_str(raw).unwrap();
        assert!(chunk.choices.is_empty());
        assert_eq!(chunk.usage, Some(Usage::new(10, 5)));
    }

    #[test]
    fn test_null_content_is_none() {
        let raw = r#"{"choices": [{"index": 0, "delta": {"content": null}, "finish_reason": "stop"}]}"#;
        let chunk: ChatChunk = serde_json::from_str(raw).unwrap();
        assert_eq!(chunk.choices[0].delta.content, None);
        assert_eq!(chunk.choices[0].finish_reason.as_deref(), Some("stop"));
    }
}

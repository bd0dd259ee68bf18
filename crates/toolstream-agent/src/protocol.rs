//! Line encoding for the AI SDK data-stream protocol.
//!
//! Every part is one line: a one-character type code, a colon, a JSON payload
//! and `\n`. Tool arguments and results are already JSON text and are spliced
//! in without re-encoding.

use crate::chunk::Usage;
use serde_json::Value;

/// Response header announcing the data-stream protocol.
pub const DATA_STREAM_HEADER: &str = "x-vercel-ai-data-stream";
/// Protocol version sent in [`DATA_STREAM_HEADER`].
pub const DATA_STREAM_VERSION: &str = "v1";

/// Why the model turn ended, as reported in the finish part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    ToolCalls,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Stop => "stop",
            FinishReason::ToolCalls => "tool-calls",
        }
    }
}

/// One part of the outgoing stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamPart {
    /// `0:` a text delta. `None` encodes as `null`.
    Text(Option<String>),
    /// `9:` a tool call announcement.
    ToolCall {
        id: String,
        name: String,
        args: String,
    },
    /// `a:` a tool call result.
    ToolResult {
        id: String,
        name: String,
        args: String,
        result: String,
    },
    /// `e:` the end-of-turn summary.
    Finish { reason: FinishReason, usage: Usage },
}

impl StreamPart {
    /// Encode as a complete protocol line, trailing newline included.
    pub fn encode(&self) -> String {
        match self {
            StreamPart::Text(text) => format!("0:{}\n", Value::from(text.as_deref())),
            StreamPart::ToolCall { id, name, args } => format!(
                "9:{{\"toolCallId\":{},\"toolName\":{},\"args\":{}}}\n",
                json_string(id),
                json_string(name),
                raw_args(args)
            ),
            StreamPart::ToolResult {
                id,
                name,
                args,
                result,
            } => format!(
                "a:{{\"toolCallId\":{},\"toolName\":{},\"args\":{},\"result\":{}}}\n",
                json_string(id),
                json_string(name),
                raw_args(args),
                result
            ),
            StreamPart::Finish { reason, usage } => format!(
                "e:{{\"finishReason\":\"{}\",\"usage\":{{\"promptTokens\":{},\"completionTokens\":{}}},\"isContinued\":false}}\n",
                reason.as_str(),
                usage.prompt_tokens,
                usage.completion_tokens
            ),
        }
    }
}

fn json_string(s: &str) -> String {
    Value::from(s).to_string()
}

/// Blank argument text stands for "no arguments".
fn raw_args(args: &str) -> &str {
    if args.trim().is_empty() {
        "{}"
    } else {
        args
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_text_part_escapes() {
        let line = StreamPart::Text(Some("say \"hi\"\n".into())).encode();
        assert_eq!(line, "0:\"say \\\"hi\\\"\\n\"\n");
    }

    #[test]
    fn test_absent_text_is_null() {
        assert_eq!(StreamPart::Text(None).encode(), "0:null\n");
    }

    #[test]
    fn test_tool_call_args_are_raw() {
        let line = StreamPart::ToolCall {
            id: "abc".into(),
            name: "get_weather".into(),
            args: r#"{"latitude":1}"#.into(),
        }
        .encode();
        assert_eq!(
            line,
            "9:{\"toolCallId\":\"abc\",\"toolName\":\"get_weather\",\"args\":{\"latitude\":1}}\n"
        );
    }

    #[test]
    fn test_empty_args_become_empty_object() {
        let line = StreamPart::ToolCall {
            id: "abc".into(),
            name: "now".into(),
            args: String::new(),
        }
        .encode();
        let payload: Value = serde_json::from_str(line.trim_end().strip_prefix("9:").unwrap()).unwrap();
        assert_eq!(payload["args"], serde_json::json!({}));
    }

    #[test]
    fn test_finish_part_field_order() {
        let line = StreamPart::Finish {
            reason: FinishReason::Stop,
            usage: Usage::new(3, 4),
        }
        .encode();
        assert_eq!(
            line,
            "e:{\"finishReason\":\"stop\",\"usage\":{\"promptTokens\":3,\"completionTokens\":4},\"isContinued\":false}\n"
        );
    }
}

//! Client chat history to upstream messages.
//!
//! The client sends AI SDK `useChat` messages: plain text content plus optional
//! attachments and the tool invocations it rendered for earlier turns.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use toolstream_core::{ChatMessage, ContentPart, ImageUrl, MessageContent, MessageToolCall, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAttachment {
    #[serde(default)]
    pub name: Option<String>,
    pub content_type: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolInvocationState {
    Call,
    PartialCall,
    Result,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    pub state: ToolInvocationState,
    pub tool_call_id: String,
    pub tool_name: String,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub result: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMessage {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "experimental_attachments")]
    pub experimental_attachments: Vec<ClientAttachment>,
    #[serde(default)]
    pub tool_invocations: Vec<ToolInvocation>,
}

/// Convert client history into upstream chat messages.
///
/// Each client message becomes one message whose content parts are its text
/// followed by its attachments. Tool invocations become assistant tool calls
/// followed by one tool message per invocation carrying the result.
pub fn convert_messages(messages: &[ClientMessage]) -> Vec<ChatMessage> {
    let mut converted = Vec::with_capacity(messages.len());

    for message in messages {
        let mut parts = vec![ContentPart::Text {
            text: message.content.clone(),
        }];
        for attachment in &message.experimental_attachments {
            if attachment.content_type.starts_with("image") {
                parts.push(ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: attachment.url.clone(),
                    },
                });
            } else if attachment.content_type.starts_with("text") {
                parts.push(ContentPart::Text {
                    text: attachment.url.clone(),
                });
            }
        }

        let tool_calls = message
            .tool_invocations
            .iter()
            .map(|inv| {
                MessageToolCall::function(&inv.tool_call_id, &inv.tool_name, inv.args.to_string())
            })
            .collect();
        converted.push(ChatMessage {
            role: message.role,
            content: Some(MessageContent::Parts(parts)),
            tool_calls,
            tool_call_id: None,
        });

        for invocation in &message.tool_invocations {
            converted.push(ChatMessage::tool(
                &invocation.tool_call_id,
                invocation.result.to_string(),
            ));
        }
    }

    converted
}

/// Text of the most recent user message, if any.
pub fn last_user_text(messages: &[ClientMessage]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Vec<ClientMessage> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_plain_message_becomes_text_part() {
        let messages = parse(json!([{"role": "user", "content": "Hello"}]));
        let converted = convert_messages(&messages);
        assert_eq!(
            serde_json::to_value(&converted).unwrap(),
            json!([{"role": "user", "content": [{"type": "text", "text": "Hello"}]}])
        );
    }

    #[test]
    fn test_attachments_become_parts() {
        let messages = parse(json!([{
            "role": "user",
            "content": "What is this?",
            "experimental_attachments": [
                {"name": "cat.png", "contentType": "image/png", "url": "data:image/png;base64,AAAA"},
                {"name": "notes.txt", "contentType": "text/plain", "url": "data:text/plain;base64,aGk="},
                {"name": "doc.pdf", "contentType": "application/pdf", "url": "https://example.test/doc.pdf"}
            ]
        }]));
        let converted = convert_messages(&messages);
        assert_eq!(
            serde_json::to_value(&converted[0].content).unwrap(),
            json!([
                {"type": "text", "text": "What is this?"},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}},
                {"type": "text", "text": "data:text/plain;base64,aGk="}
            ])
        );
    }

    #[test]
    fn test_tool_invocations_expand_to_call_and_result() {
        let messages = parse(json!([{
            "role": "assistant",
            "content": "",
            "toolInvocations": [{
                "state": "result",
                "toolCallId": "call_1",
                "toolName": "get_current_weather",
                "args": {"latitude": 1, "longitude": 2},
                "result": {"temp": 20}
            }]
        }]));
        let converted = convert_messages(&messages);

        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].tool_calls.len(), 1);
        assert_eq!(converted[0].tool_calls[0].function.name, "get_current_weather");
        assert_eq!(
            converted[0].tool_calls[0].function.arguments,
            "{\"latitude\":1,\"longitude\":2}"
        );
        assert_eq!(converted[1].role, Role::Tool);
        assert_eq!(converted[1].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(converted[1].text().as_deref(), Some("{\"temp\":20}"));
    }

    #[test]
    fn test_last_user_text() {
        let messages = parse(json!([
            {"role": "user", "content": "first"},
            {"role": "assistant", "content": "reply"},
            {"role": "user", "content": "second"},
            {"role": "assistant", "content": "reply"}
        ]));
        assert_eq!(last_user_text(&messages), Some("second"));
        assert_eq!(last_user_text(&[]), None);
    }
}

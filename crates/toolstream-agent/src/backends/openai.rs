use super::{ChunkStream, CompletionBackend, CompletionRequest, ReasoningBackend, ReasoningRequest};
use crate::chunk::ChatChunk;
use crate::config::{LlmProvider, ModelConfig};
use crate::responses::ReasoningResponse;
use async_stream::try_stream;
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use toolstream_core::{ToolstreamError, ToolstreamResult};
use toolstream_tools::ToolSpec;
use tracing::{debug, info};

/// OpenAI-compatible API backend.
///
/// Serves both the streaming chat-completions endpoint and the stateful
/// responses endpoint. Works with any provider exposing the same shapes.
pub struct OpenAiBackend {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(config: ModelConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { config, http }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.base_url().trim_end_matches('/'), path)
    }

    fn build_tools(tools: &[ToolSpec]) -> Vec<Value> {
        tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters_schema,
                    }
                })
            })
            .collect()
    }

    fn add_provider_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.bearer_auth(&self.config.api_key);

        if matches!(self.config.provider, LlmProvider::OpenRouter) {
            request.header("X-Title", "toolstream")
        } else {
            request
        }
    }

    /// POST `body` and fail on a non-success status, keeping the error body.
    async fn post(&self, path: &str, body: &Value) -> ToolstreamResult<reqwest::Response> {
        let url = self.endpoint(path);
        debug!(url = %url, "Sending upstream request");

        let resp = self
            .add_provider_headers(self.http.post(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| ToolstreamError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ToolstreamError::Upstream(format!(
                "{path} returned {status}: {error_body}"
            )));
        }
        Ok(resp)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn stream_chat(&self, request: CompletionRequest) -> ToolstreamResult<ChunkStream> {
        let mut body = json!({
            "model": request.model,
            "messages": request.messages,
            "stream": true,
            "stream_options": {"include_usage": true},
        });
        if !request.tools.is_empty() {
            body["tools"] = json!(Self::build_tools(&request.tools));
        }
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }

        info!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Opening completion stream"
        );
        let resp = self.post("chat/completions", &body).await?;
        Ok(Box::pin(sse_chunks(resp.bytes_stream())))
    }
}

#[async_trait]
impl ReasoningBackend for OpenAiBackend {
    async fn respond(&self, request: ReasoningRequest) -> ToolstreamResult<ReasoningResponse> {
        let mut body = json!({
            "model": request.model,
            "instructions": request.instructions,
            "input": request.input,
            "tools": request.tools,
            "store": true,
        });
        if let Some(previous) = &request.previous_response_id {
            body["previous_response_id"] = json!(previous);
        }
        if let Some(summary) = &request.reasoning_summary {
            body["reasoning"] = json!({ "summary": summary });
        }

        let resp = self.post("responses", &body).await?;
        resp.json::<ReasoningResponse>()
            .await
            .map_err(|e| ToolstreamError::Upstream(format!("Malformed response body: {e}")))
    }
}

/// One parsed server-sent-event line.
#[derive(Debug, PartialEq)]
enum SseLine {
    Chunk(ChatChunk),
    Done,
    Skip,
}

fn parse_sse_line(line: &str) -> ToolstreamResult<SseLine> {
    let Some(data) = line.strip_prefix("data:") else {
        // Blank separators, comments and `event:`/`id:` fields.
        return Ok(SseLine::Skip);
    };
    let data = data.trim_start();
    if data == "[DONE]" {
        return Ok(SseLine::Done);
    }

    let value: Value = serde_json::from_str(data)
        .map_err(|e| ToolstreamError::Upstream(format!("Malformed stream chunk: {e}")))?;
    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ToolstreamError::Upstream(message));
    }
    let chunk = serde_json::from_value(value)
        .map_err(|e| ToolstreamError::Upstream(format!("Malformed stream chunk: {e}")))?;
    Ok(SseLine::Chunk(chunk))
}

/// Decode an SSE byte stream into completion chunks.
///
/// Bytes are buffered until a full line is available, so multi-byte
/// characters split across network reads survive intact.
fn sse_chunks<S, B>(bytes: S) -> impl Stream<Item = ToolstreamResult<ChatChunk>> + Send + 'static
where
    S: Stream<Item = reqwest::Result<B>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    try_stream! {
        let mut bytes = Box::pin(bytes);
        let mut buffer: Vec<u8> = Vec::new();
        let mut done = false;

        while !done {
            let Some(piece) = bytes.next().await else {
                break;
            };
            let piece = piece.map_err(|e| ToolstreamError::Http(format!("Stream read error: {e}")))?;
            buffer.extend_from_slice(piece.as_ref());

            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let raw: Vec<u8> = buffer.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&raw);
                match parse_sse_line(line.trim())? {
                    SseLine::Chunk(chunk) => {
                        yield chunk;
                    }
                    SseLine::Done => {
                        done = true;
                        break;
                    }
                    SseLine::Skip => {}
                }
            }
        }

        if !done && !buffer.is_empty() {
            let line = String::from_utf8_lossy(&buffer).into_owned();
            if let SseLine::Chunk(chunk) = parse_sse_line(line.trim())? {
                yield chunk;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[test]
    fn test_parse_sse_line_variants() {
        assert_eq!(parse_sse_line("").unwrap(), SseLine::Skip);
        assert_eq!(parse_sse_line(": keep-alive").unwrap(), SseLine::Skip);
        assert_eq!(parse_sse_line("data: [DONE]").unwrap(), SseLine::Done);
        assert_eq!(
            parse_sse_line(r#"data: {"choices":[{"index":0,"delta":{"content":"hi"}}]}"#).unwrap(),
            SseLine::Chunk(ChatChunk::text("hi"))
        );
    }

    #[test]
    fn test_parse_sse_error_event() {
        let err = parse_sse_line(r#"data: {"error":{"message":"overloaded"}}"#).unwrap_err();
        assert!(matches!(err, ToolstreamError::Upstream(m) if m == "overloaded"));
    }

    #[tokio::test]
    async fn test_sse_chunks_reassembles_split_reads() {
        let text = "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"caf\u{e9}\"}}]}\n\ndata: [DONE]\n\n";
        let bytes = text.as_bytes();
        // Split inside the two-byte UTF-8 sequence.
        let split = text.find('\u{e9}').unwrap() + 1;
        let pieces: Vec<reqwest::Result<Vec<u8>>> =
            vec![Ok(bytes[..split].to_vec()), Ok(bytes[split..].to_vec())];

        let chunks: Vec<_> = sse_chunks(stream::iter(pieces)).collect().await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap(), &ChatChunk::text("caf\u{e9}"));
    }

    #[tokio::test]
    async fn test_sse_chunks_stops_at_done() {
        let text = "data: [DONE]\n\ndata: {\"choices\":[]}\n\n";
        let pieces: Vec<reqwest::Result<Vec<u8>>> = vec![Ok(text.as_bytes().to_vec())];
        let chunks: Vec<_> = sse_chunks(stream::iter(pieces)).collect().await;
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let mut config = ModelConfig::new("sk-test");
        config.api_base_url = Some("http://localhost:9999/".to_string());
        let backend = OpenAiBackend::new(config);
        assert_eq!(
            backend.endpoint("chat/completions"),
            "http://localhost:9999/v1/chat/completions"
        );
    }
}

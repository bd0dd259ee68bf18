//! Completion stream to data-stream translation.
//!
//! Text deltas pass straight through. Tool-call fragments are buffered into
//! [`DraftToolCalls`] until the model finishes with `tool_calls`, at which
//! point every new draft is announced, executed through the registry and its
//! result emitted, before the stream moves on.

use crate::chunk::{ChatChunk, ToolCallDelta, Usage};
use crate::protocol::{FinishReason, StreamPart};
use async_stream::try_stream;
use futures_util::{Stream, StreamExt};
use std::sync::Arc;
use toolstream_core::{ToolCall, ToolstreamResult};
use toolstream_tools::ToolRegistry;
use tracing::{debug, info, warn};

/// A tool call being assembled from fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl DraftToolCall {
    pub fn to_call(&self) -> ToolCall {
        ToolCall::new(&self.id, &self.name, &self.arguments)
    }
}

/// Ordered drafts for one response, with a cursor on the most recently
/// opened one. Argument fragments always extend the draft under the cursor.
#[derive(Debug, Default)]
pub struct DraftToolCalls {
    drafts: Vec<DraftToolCall>,
    cursor: Option<usize>,
    dispatched: usize,
}

impl DraftToolCalls {
    /// Start a new draft with empty arguments and move the cursor to it.
    pub fn open(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.drafts.push(DraftToolCall {
            id: id.into(),
            name: name.into(),
            arguments: String::new(),
        });
        self.cursor = Some(self.drafts.len() - 1);
    }

    /// Append argument text to the current draft. Returns `false` when no
    /// draft has been opened yet.
    pub fn extend(&mut self, fragment: &str) -> bool {
        match self.cursor.and_then(|i| self.drafts.get_mut(i)) {
            Some(draft) => {
                draft.arguments.push_str(fragment);
                true
            }
            None => false,
        }
    }

    /// Route one upstream fragment: a non-empty id opens a draft, anything
    /// else continues the current one. Argument text on an opening fragment
    /// is not kept.
    pub fn apply(&mut self, fragment: &ToolCallDelta) {
        let function = fragment.function.as_ref();
        let arguments = function
            .and_then(|f| f.arguments.as_deref())
            .unwrap_or("");
        match fragment.id.as_deref() {
            Some(id) if !id.is_empty() => {
                let name = function.and_then(|f| f.name.as_deref()).unwrap_or("");
                debug!(call_id = %id, tool = %name, "Tool call opened");
                if !arguments.is_empty() {
                    warn!(call_id = %id, "Discarding argument text on opening fragment");
                }
                self.open(id, name);
            }
            _ => {
                if !self.extend(arguments) {
                    warn!("Argument fragment arrived before any tool call was opened; dropping it");
                }
            }
        }
    }

    /// Drafts not yet handed out, marking them as dispatched.
    pub fn take_pending(&mut self) -> Vec<DraftToolCall> {
        let pending = self.drafts[self.dispatched..].to_vec();
        self.dispatched = self.drafts.len();
        pending
    }

    pub fn drafts(&self) -> &[DraftToolCall] {
        &self.drafts
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }
}

/// Turns an upstream [`ChatChunk`] stream into data-stream protocol lines,
/// executing tool calls inline.
#[derive(Clone)]
pub struct StreamTranslator {
    tools: Arc<ToolRegistry>,
}

impl StreamTranslator {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    /// Translate `chunks` lazily. Each item is one complete protocol line.
    ///
    /// An upstream error or an unknown tool ends the stream with that error.
    /// Exactly one finish line is produced: from the first usage chunk, or a
    /// zero-usage one if the upstream ends without reporting usage.
    pub fn translate<S>(&self, chunks: S) -> impl Stream<Item = ToolstreamResult<String>> + Send + 'static
    where
        S: Stream<Item = ToolstreamResult<ChatChunk>> + Send + 'static,
    {
        let tools = Arc::clone(&self.tools);
        try_stream! {
            let mut chunks = Box::pin(chunks);
            let mut drafts = DraftToolCalls::default();
            let mut finished = false;

            while let Some(chunk) = chunks.next().await {
                let chunk = chunk?;

                if chunk.choices.is_empty() {
                    if finished {
                        warn!("Ignoring extra usage chunk after finish");
                        continue;
                    }
                    finished = true;
                    yield finish_line(&drafts, chunk.usage.unwrap_or_default());
                    continue;
                }

                for choice in chunk.choices {
                    match choice.finish_reason.as_deref() {
                        Some("stop") => {}
                        Some("tool_calls") => {
                            let pending = drafts.take_pending();
                            for draft in &pending {
                                yield StreamPart::ToolCall {
                                    id: draft.id.clone(),
                                    name: draft.name.clone(),
                                    args: draft.arguments.clone(),
                                }
                                .encode();
                            }
                            for draft in pending {
                                let result = tools.invoke(&draft.to_call()).await?;
                                yield StreamPart::ToolResult {
                                    result: result.to_json(),
                                    id: draft.id,
                                    name: draft.name,
                                    args: draft.arguments,
                                }
                                .encode();
                            }
                        }
                        _ => match choice.delta.tool_calls {
                            Some(fragments) if !fragments.is_empty() => {
                                for fragment in &fragments {
                                    drafts.apply(fragment);
                                }
                            }
                            _ => {
                                yield StreamPart::Text(choice.delta.content).encode();
                            }
                        },
                    }
                }
            }

            if !finished {
                warn!("Upstream ended without a usage summary");
                yield finish_line(&drafts, Usage::default());
            }
            info!(tool_calls = drafts.len(), "Completion stream translated");
        }
    }
}

fn finish_line(drafts: &DraftToolCalls, usage: Usage) -> String {
    let reason = if drafts.is_empty() {
        FinishReason::Stop
    } else {
        FinishReason::ToolCalls
    };
    StreamPart::Finish { reason, usage }.encode()
}

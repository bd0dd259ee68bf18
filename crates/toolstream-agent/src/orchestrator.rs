use crate::backends::{ReasoningBackend, ReasoningRequest};
use crate::config::ResearchConfig;
use crate::responses::{InputItem, ReasoningTool};
use std::sync::Arc;
use toolstream_core::{ChatMessage, ToolCall, ToolstreamError, ToolstreamResult};
use toolstream_tools::ToolRegistry;
use tracing::{info, warn};

/// Prefix of the message carrying research output back into the chat.
pub const RESEARCH_RESULT_PREFIX: &str = "Result from research agent => \n";

/// Instructions sent with every reasoning request.
pub fn research_instructions(max_rounds: u32) -> String {
    let budget = if max_rounds == 0 {
        "as many requests as you need".to_string()
    } else {
        format!("at most {max_rounds} requests")
    };
    format!(
        "You are a research subagent working for a main assistant. Gather the information \
         needed to answer the user's request and hand it back to the main assistant. \
         Call the web search and document retrieval tools repeatedly, using {budget}. \
         When you are done, write one long message with everything relevant you found. \
         Be thorough rather than brief; the main assistant will do the summarizing."
    )
}

/// State carried from one reasoning round to the next.
#[derive(Debug, Clone, Default)]
pub struct AgentTurn {
    /// 1-based round number.
    pub round: u32,
    /// Continuation handle: id of the previous response, absent on round 1.
    pub previous_response_id: Option<String>,
    /// Items sent this round.
    pub input: Vec<InputItem>,
    /// Tool calls the response to this round requested.
    pub tool_calls: Vec<ToolCall>,
}

impl AgentTurn {
    fn first(query: &str) -> Self {
        Self {
            round: 1,
            previous_response_id: None,
            input: vec![InputItem::user(format!("The research query is: {query}"))],
            tool_calls: Vec::new(),
        }
    }

    fn next(&self, response_id: String, outputs: Vec<InputItem>) -> Self {
        Self {
            round: self.round + 1,
            previous_response_id: Some(response_id),
            input: outputs,
            tool_calls: Vec::new(),
        }
    }
}

/// The research sub-agent loop.
///
/// Query → reasoning model → tool calls → tool outputs → reasoning model → ...
/// until a response asks for no tools. Conversation state lives upstream;
/// only the continuation handle and the newest tool outputs are sent back.
pub struct AgentOrchestrator {
    backend: Arc<dyn ReasoningBackend>,
    tools: Arc<ToolRegistry>,
    config: ResearchConfig,
}

impl AgentOrchestrator {
    pub fn new(
        backend: Arc<dyn ReasoningBackend>,
        tools: Arc<ToolRegistry>,
        config: ResearchConfig,
    ) -> Self {
        Self {
            backend,
            tools,
            config,
        }
    }

    /// The hosted web-search tool (when enabled) followed by the configured
    /// local tools.
    pub fn offered_tools(&self) -> ToolstreamResult<Vec<ReasoningTool>> {
        let mut offered = Vec::new();
        if self.config.web_search {
            offered.push(ReasoningTool::WebSearchPreview);
        }
        offered.extend(
            self.tools
                .specs_for(&self.config.tools)?
                .into_iter()
                .map(ReasoningTool::from),
        );
        Ok(offered)
    }

    /// Run the loop for `query` and return the final response's text.
    ///
    /// Fails on any upstream error, on an unknown tool, or when the last
    /// allowed round still requests tools (those calls are not run). Other
    /// tool failures are reported back to the model.
    pub async fn run(&self, query: &str) -> ToolstreamResult<String> {
        let tools = self.offered_tools()?;
        let instructions = research_instructions(self.config.max_rounds);
        let mut turn = AgentTurn::first(query);

        info!(model = %self.config.model_id, tools = tools.len(), "Starting research agent");

        loop {
            info!(
                round = turn.round,
                input_items = turn.input.len(),
                continued = turn.previous_response_id.is_some(),
                "Research round"
            );

            let response = self
                .backend
                .respond(ReasoningRequest {
                    model: self.config.model_id.clone(),
                    instructions: instructions.clone(),
                    input: turn.input.clone(),
                    previous_response_id: turn.previous_response_id.clone(),
                    tools: tools.clone(),
                    reasoning_summary: self.config.reasoning_summary.clone(),
                })
                .await?;

            turn.tool_calls = response.tool_calls();
            if turn.tool_calls.is_empty() {
                info!(rounds = turn.round, "Research agent finished");
                return Ok(response.output_text());
            }
            if self.config.max_rounds > 0 && turn.round >= self.config.max_rounds {
                return Err(ToolstreamError::Agent(format!(
                    "Research agent still requesting tools after {} rounds",
                    self.config.max_rounds
                )));
            }

            let mut outputs = Vec::with_capacity(turn.tool_calls.len());
            for call in &turn.tool_calls {
                let result = self.tools.invoke(call).await?;
                let output = if result.is_error {
                    warn!(tool = %call.name, call_id = %call.id, "Reporting tool failure to the model");
                    format!("Error calling tool {}: {}", call.name, result.content)
                } else {
                    result.content
                };
                outputs.push(InputItem::tool_output(&call.id, output));
            }

            turn = turn.next(response.id, outputs);
        }
    }

    /// Run the loop for `query` and append its result to `messages` as a
    /// user message.
    pub async fn augment(&self, query: &str, messages: &mut Vec<ChatMessage>) -> ToolstreamResult<()> {
        let text = self.run(query).await?;
        messages.push(ChatMessage::user(format!("{RESEARCH_RESULT_PREFIX}{text}")));
        Ok(())
    }
}

use crate::backends::{CompletionBackend, CompletionRequest, ReasoningBackend};
use crate::config::BridgeConfig;
use crate::orchestrator::AgentOrchestrator;
use crate::translator::StreamTranslator;
use futures_util::stream::BoxStream;
use std::sync::Arc;
use toolstream_core::{ChatMessage, ToolstreamResult};
use toolstream_tools::ToolRegistry;
use tracing::info;

/// Protocol lines produced for one chat request.
pub type LineStream = BoxStream<'static, ToolstreamResult<String>>;

/// Application context built once at startup: upstream clients, the tool
/// registry and configuration. Cheap to share behind an `Arc`.
pub struct Bridge {
    config: BridgeConfig,
    completions: Arc<dyn CompletionBackend>,
    reasoning: Arc<dyn ReasoningBackend>,
    tools: Arc<ToolRegistry>,
}

impl Bridge {
    /// Build the context, checking that every offered tool is registered.
    pub fn new(
        config: BridgeConfig,
        completions: Arc<dyn CompletionBackend>,
        reasoning: Arc<dyn ReasoningBackend>,
        tools: Arc<ToolRegistry>,
    ) -> ToolstreamResult<Self> {
        tools.specs_for(&config.chat.tools)?;
        tools.specs_for(&config.research.tools)?;
        Ok(Self {
            config,
            completions,
            reasoning,
            tools,
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    pub fn translator(&self) -> StreamTranslator {
        StreamTranslator::new(Arc::clone(&self.tools))
    }

    pub fn orchestrator(&self) -> AgentOrchestrator {
        AgentOrchestrator::new(
            Arc::clone(&self.reasoning),
            Arc::clone(&self.tools),
            self.config.research.clone(),
        )
    }

    /// Open a completion stream for `messages` and translate it.
    ///
    /// Errors before the first chunk (unreachable upstream, rejected request)
    /// are returned directly; later ones arrive on the stream.
    pub async fn stream_chat(&self, messages: Vec<ChatMessage>) -> ToolstreamResult<LineStream> {
        let request = CompletionRequest {
            model: self.config.model.model_id.clone(),
            messages,
            tools: self.tools.specs_for(&self.config.chat.tools)?,
            temperature: self.config.model.temperature,
        };
        let chunks = self.completions.stream_chat(request).await?;
        info!(model = %self.config.model.model_id, "Streaming chat response");
        Ok(Box::pin(self.translator().translate(chunks)))
    }
}

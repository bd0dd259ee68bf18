use crate::tool::{Tool, ToolArgs, ToolSpec};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use toolstream_core::{ToolCall, ToolResult, ToolstreamError, ToolstreamResult};
use tracing::{info, warn};

/// Central registry for all available tools.
///
/// Built once at startup and shared read-only (behind an `Arc`) by every
/// in-flight request. Registration order is preserved so the specs offered to
/// the model are stable.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. A later registration under the same name replaces the
    /// earlier one but keeps its position.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.spec().name.clone();
        info!(tool = %name, "Registered tool");
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    /// Specs of every registered tool, in registration order.
    pub fn list_specs(&self) -> Vec<&ToolSpec> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.spec())
            .collect()
    }

    /// Specs for the named subset of tools, in the order given.
    ///
    /// Fails if a name has no registered capability: the tools offered to the
    /// model and the tools we can execute must stay in sync.
    pub fn specs_for(&self, names: &[String]) -> ToolstreamResult<Vec<ToolSpec>> {
        names
            .iter()
            .map(|name| {
                self.tools
                    .get(name)
                    .map(|t| t.spec().clone())
                    .ok_or_else(|| {
                        ToolstreamError::Config(format!("Tool '{name}' is offered but not registered"))
                    })
            })
            .collect()
    }

    /// Dispatch a tool call.
    ///
    /// Only an unknown tool name is an `Err`. Malformed arguments, a failing
    /// capability and an unserializable result all come back as an error
    /// [`ToolResult`] carrying the error text.
    pub async fn invoke(&self, call: &ToolCall) -> ToolstreamResult<ToolResult> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolstreamError::UnknownTool(call.name.clone()))?;

        let args = match parse_arguments(&call.arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "Malformed tool arguments");
                return Ok(ToolResult::error(&call.id, e.to_string()));
            }
        };

        info!(tool = %call.name, call_id = %call.id, "Invoking tool");

        match tool.call(args).await {
            Ok(value) => match serde_json::to_string(&value) {
                Ok(content) => Ok(ToolResult::success(&call.id, content)),
                Err(e) => Ok(ToolResult::error(&call.id, e.to_string())),
            },
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "Tool invocation failed");
                Ok(ToolResult::error(&call.id, e.to_string()))
            }
        }
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the model's argument text into named arguments.
///
/// Blank text means "no arguments". Anything other than a JSON object is rejected.
pub fn parse_arguments(raw: &str) -> ToolstreamResult<ToolArgs> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(ToolArgs::new());
    }
    match serde_json::from_str::<Value>(trimmed)? {
        Value::Object(args) => Ok(args),
        other => Err(ToolstreamError::Tool(format!(
            "Tool arguments must be a JSON object, got: {other}"
        ))),
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use toolstream_core::ToolstreamResult;

/// Named arguments handed to a tool, parsed from the model's JSON text.
pub type ToolArgs = serde_json::Map<String, Value>;

/// Description of a tool as offered to the upstream model.
///
/// The parameter schema is forwarded verbatim and never validated locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters_schema: Value,
}

impl ToolSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema,
        }
    }
}

/// A capability the model can invoke: accepts named arguments, returns a
/// serializable value or fails.
#[async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> &ToolSpec;

    async fn call(&self, args: ToolArgs) -> ToolstreamResult<Value>;
}

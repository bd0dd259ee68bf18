use crate::tool::{Tool, ToolArgs, ToolSpec};
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::future::Future;
use toolstream_core::ToolstreamResult;

type Handler = dyn Fn(ToolArgs) -> BoxFuture<'static, ToolstreamResult<Value>> + Send + Sync;

/// A [`ToolSpec`] paired with a closure that implements it.
///
/// Useful for small tools that don't warrant their own type:
///
/// ```
/// use toolstream_tools::{ToolBinding, ToolSpec};
///
/// let echo = ToolBinding::new(
///     ToolSpec::new("echo", "Echo the arguments back", serde_json::json!({"type": "object"})),
///     |args| async move { Ok(serde_json::Value::Object(args)) },
/// );
/// # let _ = echo;
/// ```
pub struct ToolBinding {
    spec: ToolSpec,
    handler: Box<Handler>,
}

impl ToolBinding {
    /// Binds `handler` to `spec`.
    pub fn new<F, Fut>(spec: ToolSpec, handler: F) -> Self
    where
        F: Fn(ToolArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolstreamResult<Value>> + Send + 'static,
    {
        Self {
            spec,
            handler: Box::new(move |args| Box::pin(handler(args))),
        }
    }
}

#[async_trait]
impl Tool for ToolBinding {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(&self, args: ToolArgs) -> ToolstreamResult<Value> {
        (self.handler)(args).await
    }
}

impl std::fmt::Debug for ToolBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolBinding")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

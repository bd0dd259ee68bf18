//! Tool registry for toolstream.
//!
//! A tool is a [`ToolSpec`] (what the model is told about it) plus a capability
//! implementing [`Tool`]. The [`ToolRegistry`] maps names to tools and dispatches
//! model-issued calls, folding every per-call failure into a
//! [`toolstream_core::ToolResult`].

/// Closure-backed tools.
pub mod binding;
/// Name-keyed registry and dispatcher.
pub mod registry;
/// Tool spec and capability trait.
pub mod tool;

pub use binding::ToolBinding;
pub use registry::{parse_arguments, ToolRegistry};
pub use tool::{Tool, ToolArgs, ToolSpec};

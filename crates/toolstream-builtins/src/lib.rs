//! Built-in tools for toolstream.
//!
//! - `get_current_weather` ([`WeatherTool`]) queries the open-meteo forecast API.
//! - `similarity_search_pdf` ([`SimilaritySearchTool`]) searches the ingested
//!   document index.
//!
//! [`register_builtins()`] adds both to a [`ToolRegistry`].

/// Document similarity search tool.
pub mod similarity;
/// Current weather tool.
pub mod weather;

pub use similarity::{Passage, SimilaritySearchTool};
pub use weather::{WeatherTool, OPEN_METEO_URL};

use std::sync::Arc;
use toolstream_tools::ToolRegistry;

/// Register the built-in tools. Returns the similarity search tool so callers
/// can also run retrieval directly.
pub fn register_builtins(
    registry: &mut ToolRegistry,
    weather: WeatherTool,
    search: SimilaritySearchTool,
) -> Arc<SimilaritySearchTool> {
    let search = Arc::new(search);
    registry.register(Arc::new(weather));
    registry.register(search.clone());
    search
}

mod config;
mod ingest;

use clap::{Parser, Subcommand};
use config::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;
use toolstream_agent::{Bridge, OpenAiBackend};
use toolstream_builtins::{register_builtins, SimilaritySearchTool, WeatherTool};
use toolstream_gateway::GatewayServer;
use toolstream_memory::{EmbeddingProvider, FileVectorStore, LocalEmbedding, TextSplitter, VectorStore};
use toolstream_tools::ToolRegistry;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "toolstream", about = "Streaming chat bridge with inline tool calls and a research agent")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "toolstream.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List registered tools and the endpoints offering them
    Tools,
    /// Split, embed and index plain-text documents
    Ingest {
        /// Files to index
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Registry with the built-in tools, plus the search tool for direct retrieval.
fn build_registry(
    config: &AppConfig,
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
) -> (ToolRegistry, Arc<SimilaritySearchTool>) {
    let mut registry = ToolRegistry::new();
    let search = register_builtins(
        &mut registry,
        WeatherTool::new(&config.weather.base_url),
        SimilaritySearchTool::new(store, embedder, config.retrieval.k),
    );
    info!(count = registry.tool_count(), "Built-in tools registered");
    (registry, search)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config).await?;
    config.apply_env_key(std::env::var("OPENAI_API_KEY").ok());

    let embedder: Arc<dyn EmbeddingProvider> =
        Arc::new(LocalEmbedding::new(config.retrieval.dimension));
    let store = Arc::new(FileVectorStore::open(config.retrieval.store_path.clone()).await?);

    match cli.command {
        Commands::Serve { host, port } => {
            if config.model.api_key.is_empty() {
                warn!("No API key configured; upstream requests will be rejected");
            }
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let (registry, search) = build_registry(&config, store, embedder);
            let backend = Arc::new(OpenAiBackend::new(config.model.clone()));
            let bridge = Bridge::new(
                config.bridge_config(),
                backend.clone(),
                backend,
                Arc::new(registry),
            )?;

            let app = GatewayServer::build(Arc::new(bridge), Some(search));
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!(
                addr = %addr,
                model = %config.model.model_id,
                research_model = %config.research.model_id,
                "toolstream gateway listening"
            );
            axum::serve(listener, app).await?;
        }
        Commands::Tools => {
            let (registry, _) = build_registry(&config, store, embedder);
            println!("Registered tools:");
            for spec in registry.list_specs() {
                let mut offered = Vec::new();
                if config.chat.tools.contains(&spec.name) {
                    offered.push("chat");
                }
                if config.research.tools.contains(&spec.name) {
                    offered.push("research");
                }
                let offered = if offered.is_empty() {
                    "not offered".to_string()
                } else {
                    offered.join(", ")
                };
                println!("  {} [{offered}]: {}", spec.name, spec.description);
            }
            if config.research.web_search {
                println!("  web_search_preview [research]: hosted web search");
            }
            println!("\nTotal: {} tool(s)", registry.tool_count());
        }
        Commands::Ingest { files } => {
            let splitter =
                TextSplitter::new(config.retrieval.chunk_size, config.retrieval.chunk_overlap)?;
            let mut total = 0;
            for file in &files {
                let stored =
                    ingest::ingest_file(file, &splitter, embedder.as_ref(), store.as_ref()).await?;
                println!("{}: {stored} chunk(s)", file.display());
                total += stored;
            }
            println!(
                "\nIndexed {total} chunk(s) into {} ({} total)",
                config.retrieval.store_path.display(),
                store.count().await?
            );
        }
    }

    Ok(())
}

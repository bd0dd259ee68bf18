//! `toolstream.toml` layout.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use toolstream_agent::{BridgeConfig, ChatConfig, ModelConfig, ResearchConfig};
use toolstream_builtins::OPEN_METEO_URL;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub research: ResearchConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {e}", path.display())
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// Fill an empty `model.api_key` from `OPENAI_API_KEY`.
    pub fn apply_env_key(&mut self, env_key: Option<String>) {
        if self.model.api_key.is_empty() {
            if let Some(key) = env_key.filter(|k| !k.is_empty()) {
                self.model.api_key = key;
            }
        }
    }

    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            model: self.model.clone(),
            chat: self.chat.clone(),
            research: self.research.clone(),
        }
    }
}

/// Document index used by `similarity_search_pdf` and `ingest`.
#[derive(Debug, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Embedding vector length. Changing it invalidates an existing index.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            dimension: default_dimension(),
            k: default_k(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/index.jsonl")
}
fn default_dimension() -> usize {
    256
}
fn default_k() -> usize {
    10
}
fn default_chunk_size() -> usize {
    1000
}
fn default_chunk_overlap() -> usize {
    200
}
fn default_weather_url() -> String {
    OPEN_METEO_URL.to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

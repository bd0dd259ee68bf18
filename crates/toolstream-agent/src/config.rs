use serde::{Deserialize, Serialize};

/// Which OpenAI-compatible service the backend talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// api.openai.com: chat completions and the responses API.
    OpenAi,
    /// OpenRouter's OpenAI-compatible endpoint.
    OpenRouter,
    /// Groq cloud inference (OpenAI-compatible).
    Groq,
}

/// Upstream connection settings and the model used for chat streaming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_provider")]
    pub provider: LlmProvider,
    #[serde(default = "default_chat_model")]
    pub model_id: String,
    /// Falls back to `OPENAI_API_KEY` when left empty (resolved by the binary).
    #[serde(default)]
    pub api_key: String,
    pub api_base_url: Option<String>,
    pub temperature: Option<f32>,
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            provider: default_provider(),
            model_id: default_chat_model(),
            api_key: api_key.into(),
            api_base_url: None,
            temperature: None,
        }
    }

    pub fn base_url(&self) -> &str {
        if let Some(url) = &self.api_base_url {
            url
        } else {
            match self.provider {
                LlmProvider::OpenAi => "https://api.openai.com",
                LlmProvider::OpenRouter => "https://openrouter.ai/api",
                LlmProvider::Groq => "https://api.groq.com/openai",
            }
        }
    }
}

/// Settings for the streaming chat path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Registered tools offered to the completion model.
    #[serde(default = "default_chat_tools")]
    pub tools: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            tools: default_chat_tools(),
        }
    }
}

/// Settings for the research sub-agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    #[serde(default = "default_research_model")]
    pub model_id: String,
    /// Hard cap on reasoning rounds; `0` disables the cap.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default = "default_reasoning_summary")]
    pub reasoning_summary: Option<String>,
    /// Offer the hosted web-search tool.
    #[serde(default = "default_true")]
    pub web_search: bool,
    /// Registered tools offered to the reasoning model.
    #[serde(default = "default_research_tools")]
    pub tools: Vec<String>,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            model_id: default_research_model(),
            max_rounds: default_max_rounds(),
            reasoning_summary: default_reasoning_summary(),
            web_search: true,
            tools: default_research_tools(),
        }
    }
}

/// Everything the [`crate::Bridge`] needs besides its collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub research: ResearchConfig,
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAi
}

fn default_chat_model() -> String {
    "gpt-4o".to_string()
}

fn default_research_model() -> String {
    "o4-mini".to_string()
}

fn default_max_rounds() -> u32 {
    10
}

fn default_reasoning_summary() -> Option<String> {
    Some("detailed".to_string())
}

fn default_true() -> bool {
    true
}

fn default_chat_tools() -> Vec<String> {
    vec!["get_current_weather".to_string()]
}

fn default_research_tools() -> Vec<String> {
    vec!["similarity_search_pdf".to_string()]
}

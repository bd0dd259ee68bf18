use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use toolstream_core::{ToolstreamError, ToolstreamResult};
use toolstream_memory::{EmbeddingProvider, VectorStore};
use toolstream_tools::{Tool, ToolArgs, ToolSpec};
use tracing::info;

/// Upper bound on `k` accepted from the model.
const MAX_K: usize = 50;

/// One retrieved passage.
#[derive(Debug, Clone, Serialize)]
pub struct Passage {
    pub content: String,
    pub metadata: HashMap<String, Value>,
    pub score: f32,
}

/// Similarity search over the ingested document index.
pub struct SimilaritySearchTool {
    spec: ToolSpec,
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    default_k: usize,
}

impl SimilaritySearchTool {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        default_k: usize,
    ) -> Self {
        Self {
            spec: ToolSpec::new(
                "similarity_search_pdf",
                "Performs similarity search in the indexed documents based on a query.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "The query string to search for"
                        },
                        "k": {
                            "type": "number",
                            "description": "The number of most similar passages to return"
                        }
                    },
                    "required": ["query", "k"],
                    "additionalProperties": false
                }),
            ),
            store,
            embedder,
            default_k: default_k.max(1),
        }
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    /// The `k` passages closest to `query`, best first.
    pub async fn search(&self, query: &str, k: usize) -> ToolstreamResult<Vec<Passage>> {
        let embedding = self.embedder.embed(query).await?;
        let results = self.store.search(&embedding, k).await?;
        info!(k, hits = results.len(), "Similarity search");

        Ok(results
            .into_iter()
            .map(|r| Passage {
                content: r.document.content,
                metadata: r.document.metadata,
                score: r.score,
            })
            .collect())
    }
}

#[async_trait]
impl Tool for SimilaritySearchTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(&self, args: ToolArgs) -> ToolstreamResult<Value> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| ToolstreamError::Tool("Missing string argument 'query'".to_string()))?;

        let k = args
            .get("k")
            .and_then(Value::as_f64)
            .filter(|k| *k >= 1.0)
            .map(|k| (k as usize).min(MAX_K))
            .unwrap_or(self.default_k);

        let passages = self.search(query, k).await?;
        Ok(serde_json::to_value(passages)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolstream_memory::{Document, InMemoryVectorStore, LocalEmbedding};

    async fn indexed_tool() -> SimilaritySearchTool {
        let store = Arc::new(InMemoryVectorStore::new());
        let embedder = Arc::new(LocalEmbedding::default());
        for (page, text) in [
            (1, "Henry the Eighth had six wives."),
            (2, "The Spanish Armada sailed in 1588."),
            (3, "Anne Boleyn was the second wife of Henry."),
        ] {
            let embedding = embedder.embed(text).await.unwrap();
            store
                .insert(Document::new(text, embedding).with_metadata("page", json!(page)))
                .await
                .unwrap();
        }
        SimilaritySearchTool::new(store, embedder, 10)
    }

    fn args(value: Value) -> ToolArgs {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_search_returns_best_first() {
        let tool = indexed_tool().await;
        let passages = tool.search("Armada 1588", 1).await.unwrap();
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].metadata["page"], json!(2));
    }

    #[tokio::test]
    async fn test_call_serializes_passages() {
        let tool = indexed_tool().await;
        let value = tool
            .call(args(json!({"query": "wives of Henry", "k": 2})))
            .await
            .unwrap();
        let passages = value.as_array().unwrap();
        assert_eq!(passages.len(), 2);
        assert!(passages[0]["content"].as_str().unwrap().contains("Henry"));
        assert!(passages[0]["score"].is_number());
    }

    #[tokio::test]
    async fn test_call_defaults_k() {
        let tool = indexed_tool().await;
        let value = tool.call(args(json!({"query": "Henry"}))).await.unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_call_requires_query() {
        let tool = indexed_tool().await;
        assert!(tool.call(args(json!({"k": 2}))).await.is_err());
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use toolstream_core::{ToolstreamError, ToolstreamResult};
use tracing::info;
use uuid::Uuid;

/// One indexed chunk of a source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub content: String,
    pub embedding: Vec<f32>,
    /// Free-form provenance (`source`, `chunk`, `page`, ...).
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            embedding,
            metadata: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Result of a similarity query.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub document: Document,
    pub score: f32,
}

/// Trait for vector index backends.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert a document.
    async fn insert(&self, document: Document) -> ToolstreamResult<()>;

    /// The `top_k` documents most similar to `query_embedding`, best first.
    async fn search(&self, query_embedding: &[f32], top_k: usize)
        -> ToolstreamResult<Vec<SearchResult>>;

    /// Delete a document by ID. Returns whether anything was removed.
    async fn delete(&self, id: Uuid) -> ToolstreamResult<bool>;

    /// All documents in insertion order.
    async fn list(&self) -> ToolstreamResult<Vec<Document>>;

    /// Number of indexed documents.
    async fn count(&self) -> ToolstreamResult<usize>;
}

/// Brute-force cosine-similarity index held in memory.
pub struct InMemoryVectorStore {
    documents: RwLock<Vec<Document>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn insert(&self, document: Document) -> ToolstreamResult<()> {
        self.documents.write().await.push(document);
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> ToolstreamResult<Vec<SearchResult>> {
        if query_embedding.is_empty() {
            return Err(ToolstreamError::Memory("Empty query embedding".to_string()));
        }

        let documents = self.documents.read().await;
        let mut scored: Vec<SearchResult> = documents
            .iter()
            .map(|d| SearchResult {
                score: cosine_similarity(query_embedding, &d.embedding),
                document: d.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn delete(&self, id: Uuid) -> ToolstreamResult<bool> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| d.id != id);
        Ok(documents.len() < before)
    }

    async fn list(&self) -> ToolstreamResult<Vec<Document>> {
        Ok(self.documents.read().await.clone())
    }

    async fn count(&self) -> ToolstreamResult<usize> {
        Ok(self.documents.read().await.len())
    }
}

/// Vector index persisted as JSONL: one [`Document`] per line.
///
/// Everything is loaded into memory on open. Inserts append a line; deletes
/// rewrite the file.
pub struct FileVectorStore {
    path: PathBuf,
    inner: InMemoryVectorStore,
}

impl FileVectorStore {
    /// Open (or create) the store at `path`.
    pub async fn open(path: PathBuf) -> ToolstreamResult<Self> {
        let inner = InMemoryVectorStore::new();

        if tokio::fs::try_exists(&path).await? {
            let data = tokio::fs::read_to_string(&path).await?;
            for (lineno, line) in data.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let document: Document = serde_json::from_str(line).map_err(|e| {
                    ToolstreamError::Memory(format!(
                        "Invalid document at {}:{}: {e}",
                        path.display(),
                        lineno + 1
                    ))
                })?;
                inner.insert(document).await?;
            }
            info!(path = %path.display(), documents = inner.count().await?, "Loaded vector store");
        } else if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        Ok(Self { path, inner })
    }

    async fn append_line(&self, document: &Document) -> ToolstreamResult<()> {
        use tokio::io::AsyncWriteExt;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let mut line = serde_json::to_string(document)?;
        line.push('\n');
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }

    async fn rewrite(&self) -> ToolstreamResult<()> {
        let mut data = String::new();
        for document in self.inner.list().await? {
            data.push_str(&serde_json::to_string(&document)?);
            data.push('\n');
        }
        tokio::fs::write(&self.path, data.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn insert(&self, document: Document) -> ToolstreamResult<()> {
        self.append_line(&document).await?;
        self.inner.insert(document).await
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> ToolstreamResult<Vec<SearchResult>> {
        self.inner.search(query_embedding, top_k).await
    }

    async fn delete(&self, id: Uuid) -> ToolstreamResult<bool> {
        let deleted = self.inner.delete(id).await?;
        if deleted {
            self.rewrite().await?;
        }
        Ok(deleted)
    }

    async fn list(&self) -> ToolstreamResult<Vec<Document>> {
        self.inner.list().await
    }

    async fn count(&self) -> ToolstreamResult<usize> {
        self.inner.count().await
    }
}

/// Cosine similarity; 0 for mismatched lengths or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_count() {
        let store = InMemoryVectorStore::new();
        assert_eq!(store.count().await.unwrap(), 0);

        store.insert(Document::new("hello", vec![1.0, 0.0, 0.0])).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let store = InMemoryVectorStore::new();
        store.insert(Document::new("cooking", vec![0.0, 0.0, 1.0])).await.unwrap();
        store.insert(Document::new("tudor kings", vec![0.9, 0.1, 0.0])).await.unwrap();

        let results = store.search(&[1.0, 0.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.content, "tudor kings");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_search_truncates_to_top_k() {
        let store = InMemoryVectorStore::new();
        for i in 0..10 {
            let mut emb = vec![0.0f32; 3];
            emb[i % 3] = 1.0;
            store.insert(Document::new(format!("chunk_{i}"), emb)).await.unwrap();
        }
        assert_eq!(store.search(&[1.0, 0.0, 0.0], 3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let store = InMemoryVectorStore::new();
        assert!(store.search(&[], 3).await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryVectorStore::new();
        let doc = Document::new("to_delete", vec![1.0]);
        let id = doc.id;
        store.insert(doc).await.unwrap();

        assert!(store.delete(id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(!store.delete(Uuid::new_v4()).await.unwrap());
    }

    #[test]
    fn test_cosine_similarity_edges() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 1.0], &[2.0, 2.0]) - 1.0).abs() < 1e-6);
    }
}

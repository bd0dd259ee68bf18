//! Plain-text document ingestion into the retrieval index.
//!
//! Form feeds (`\f`, as emitted by `pdftotext`) mark page breaks; every chunk
//! records its source file, 1-based page and chunk index so answers can cite
//! pages.

use serde_json::json;
use std::path::Path;
use toolstream_core::ToolstreamResult;
use toolstream_memory::{Document, EmbeddingProvider, TextSplitter, VectorStore};
use tracing::info;

/// A chunk of a page, ready to embed.
#[derive(Debug, Clone, PartialEq)]
pub struct PageChunk {
    pub page: usize,
    pub chunk: usize,
    pub text: String,
}

pub fn page_chunks(text: &str, splitter: &TextSplitter) -> Vec<PageChunk> {
    let mut chunks = Vec::new();
    for (page_idx, page) in text.split('\u{c}').enumerate() {
        for (chunk_idx, piece) in splitter
            .split(page)
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .enumerate()
        {
            chunks.push(PageChunk {
                page: page_idx + 1,
                chunk: chunk_idx,
                text: piece,
            });
        }
    }
    chunks
}

/// Index one file. Returns the number of chunks stored.
pub async fn ingest_file(
    path: &Path,
    splitter: &TextSplitter,
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
) -> ToolstreamResult<usize> {
    let text = tokio::fs::read_to_string(path).await?;
    let chunks = page_chunks(&text, splitter);
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    let source = path.display().to_string();
    for (chunk, embedding) in chunks.iter().zip(embeddings) {
        let document = Document::new(chunk.text.clone(), embedding)
            .with_metadata("source", json!(source))
            .with_metadata("page", json!(chunk.page))
            .with_metadata("chunk", json!(chunk.chunk));
        store.insert(document).await?;
    }

    info!(source = %source, chunks = chunks.len(), "Ingested document");
    Ok(chunks.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use toolstream_memory::{FileVectorStore, LocalEmbedding};

    #[test]
    fn test_form_feed_starts_new_page() {
        let splitter = TextSplitter::new(100, 10).unwrap();
        let chunks = page_chunks("Preface text\u{c}Chapter one\u{c}\u{c}Chapter two", &splitter);

        let pages: Vec<(usize, &str)> = chunks.iter().map(|c| (c.page, c.text.as_str())).collect();
        assert_eq!(
            pages,
            vec![(1, "Preface text"), (2, "Chapter one"), (4, "Chapter two")]
        );
        assert!(chunks.iter().all(|c| c.chunk == 0));
    }

    #[test]
    fn test_long_page_is_chunked() {
        let splitter = TextSplitter::new(20, 5).unwrap();
        let page = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let chunks = page_chunks(page, &splitter);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.page == 1 && c.text.chars().count() <= 20));
        let indices: Vec<usize> = chunks.iter().map(|c| c.chunk).collect();
        assert_eq!(indices, (0..chunks.len()).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_ingest_file_persists_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        let doc_path = tmp.path().join("tudors.txt");
        tokio::fs::write(&doc_path, "Henry VII founded the dynasty.\u{c}Henry VIII married six times.")
            .await
            .unwrap();
        let index_path = tmp.path().join("index.jsonl");

        let splitter = TextSplitter::default();
        let embedder = LocalEmbedding::default();
        let store = FileVectorStore::open(index_path.clone()).await.unwrap();
        let stored = ingest_file(&doc_path, &splitter, &embedder, &store).await.unwrap();
        assert_eq!(stored, 2);

        let reopened = FileVectorStore::open(index_path).await.unwrap();
        let documents = reopened.list().await.unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1].content, "Henry VIII married six times.");
        assert_eq!(documents[1].metadata["page"], json!(2));
        assert_eq!(documents[1].metadata["chunk"], json!(0));
        assert_eq!(
            documents[1].metadata["source"],
            json!(doc_path.display().to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let store = toolstream_memory::InMemoryVectorStore::new();
        let result = ingest_file(
            Path::new("/nonexistent/book.txt"),
            &TextSplitter::default(),
            &LocalEmbedding::default(),
            &store,
        )
        .await;
        assert!(matches!(result, Err(toolstream_core::ToolstreamError::Io(_))));
    }
}

//! Retrieval backing store for the similarity-search tool.
//!
//! Provides embedding generation, a cosine-similarity vector index (in memory or
//! persisted as JSONL) and the text splitter used to chunk documents before they
//! are indexed.
//!
//! # Main types
//!
//! - [`EmbeddingProvider`] — Trait for turning text into vectors.
//! - [`LocalEmbedding`] — Local hashed bag-of-words embedding.
//! - [`VectorStore`] — Trait for storing and querying document chunks.
//! - [`FileVectorStore`] — JSONL-backed persistent index.
//! - [`TextSplitter`] — Recursive character splitter with overlap.

/// Embedding provider trait and local implementation.
pub mod embedding;
/// Recursive character text splitter.
pub mod splitter;
/// Vector store trait and implementations.
pub mod store;

pub use embedding::{EmbeddingProvider, LocalEmbedding};
pub use splitter::TextSplitter;
pub use store::{cosine_similarity, Document, FileVectorStore, InMemoryVectorStore, SearchResult, VectorStore};

use async_trait::async_trait;
use std::collections::HashMap;
use toolstream_core::{ToolstreamError, ToolstreamResult};

/// Trait for computing text embeddings.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> ToolstreamResult<Vec<f32>>;

    /// Embed several texts, in order.
    async fn embed_batch(&self, texts: &[&str]) -> ToolstreamResult<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Length of the vectors this provider produces.
    fn dimension(&self) -> usize;
}

/// Hashed bag-of-words embedding computed locally.
///
/// Each token's term frequency is spread over three hashed buckets of a fixed
/// size vector, which is then L2-normalized. Cheap and deterministic; lexical
/// overlap is all it captures.
pub struct LocalEmbedding {
    dimension: usize,
}

impl LocalEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }
}

impl Default for LocalEmbedding {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbedding {
    async fn embed(&self, text: &str) -> ToolstreamResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(ToolstreamError::Memory("Cannot embed empty text".to_string()));
        }

        let lowered = text.to_lowercase();
        let mut counts: HashMap<&str, f32> = HashMap::new();
        let mut total = 0.0f32;
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.chars().count() > 1)
        {
            *counts.entry(token).or_insert(0.0) += 1.0;
            total += 1.0;
        }

        let mut vector = vec![0.0f32; self.dimension];
        if total == 0.0 {
            return Ok(vector);
        }

        for (token, count) in &counts {
            let tf = count / total;
            for (salt, weight) in [(0u8, 1.0f32), (1, 0.7), (2, 0.5)] {
                let bucket = fnv1a(token.as_bytes(), salt) as usize % self.dimension;
                vector[bucket] += tf * weight;
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn fnv1a(data: &[u8], salt: u8) -> u32 {
    let mut hash: u32 = 2_166_136_261;
    for &byte in data.iter().chain(std::iter::once(&salt)) {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::store::cosine_similarity;

    #[tokio::test]
    async fn test_dimension_and_norm() {
        let emb = LocalEmbedding::new(128);
        let vec = emb.embed("the quick brown fox jumps").await.unwrap();
        assert_eq!(vec.len(), 128);
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_related_texts_score_higher() {
        let emb = LocalEmbedding::default();
        let v1 = emb.embed("henry the eighth and his wives").await.unwrap();
        let v2 = emb.embed("the wives of henry").await.unwrap();
        let v3 = emb.embed("steam engines and railways").await.unwrap();

        assert!(cosine_similarity(&v1, &v2) > cosine_similarity(&v1, &v3));
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let emb = LocalEmbedding::default();
        assert!(emb.embed("   ").await.is_err());
    }

    #[tokio::test]
    async fn test_batch_is_deterministic() {
        let emb = LocalEmbedding::default();
        let vecs = emb.embed_batch(&["magna carta", "magna carta"]).await.unwrap();
        assert_eq!(vecs.len(), 2);
        assert_eq!(vecs[0], vecs[1]);
    }
}

//! In-memory semantic index over passages.
//!
//! Vectors and passage metadata live in two index-aligned vectors; the only
//! ways to obtain an index are whole-index constructors, so `vectors[i]`
//! always belongs to `metadata[i]`. Stored vectors are L2-normalized once at
//! construction, which makes cosine similarity a plain dot product at query
//! time.

use tracing::{debug, info, warn};

use crate::embed::EmbeddingsProvider;
use crate::errors::StoreError;
use crate::record::Passage;

/// Default minimum similarity (exclusive) for a semantic hit.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.2;

/// Where a stored vector came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassageMeta {
    pub filename: String,
    pub text: String,
}

/// A ranked query result: position in the index plus cosine similarity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredIndex {
    pub index: usize,
    pub similarity: f32,
}

impl ScoredIndex {
    /// Similarity as a percentage rounded to one decimal.
    pub fn confidence(&self) -> f32 {
        confidence(self.similarity)
    }
}

/// `round(similarity * 100, 1)`.
pub fn confidence(similarity: f32) -> f32 {
    ((f64::from(similarity) * 1000.0).round() / 10.0) as f32
}

#[derive(Clone, Debug, Default)]
pub struct VectorIndex {
    vectors: Vec<Vec<f32>>,
    metadata: Vec<PassageMeta>,
    dim: usize,
}

impl VectorIndex {
    /// Index with no vectors; every query returns nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds an index from parallel vectors and metadata.
    ///
    /// # Errors
    /// `VectorSizeMismatch` when the two sides differ in length or the vectors
    /// differ in dimension, `NonFiniteVector` when a vector holds NaN or
    /// infinity.
    pub fn from_parts(
        vectors: Vec<Vec<f32>>,
        metadata: Vec<PassageMeta>,
    ) -> Result<Self, StoreError> {
        if vectors.len() != metadata.len() {
            return Err(StoreError::VectorSizeMismatch {
                got: vectors.len(),
                want: metadata.len(),
            });
        }

        let dim = vectors.first().map_or(0, Vec::len);
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(StoreError::VectorSizeMismatch {
                got: bad.len(),
                want: dim,
            });
        }
        if let Some(index) = vectors
            .iter()
            .position(|v| v.iter().any(|x| !x.is_finite()))
        {
            return Err(StoreError::NonFiniteVector { index });
        }

        let vectors = vectors.into_iter().map(normalized).collect();
        Ok(Self {
            vectors,
            metadata,
            dim,
        })
    }

    /// Embeds all passages in one batch and builds the index.
    ///
    /// # Errors
    /// Provider failures and malformed responses.
    pub async fn try_build(
        passages: &[Passage],
        provider: &dyn EmbeddingsProvider,
    ) -> Result<Self, StoreError> {
        if passages.is_empty() {
            return Ok(Self::empty());
        }

        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        info!(passages = texts.len(), "creating passage embeddings");
        let vectors = provider.embed_batch(&texts).await?;

        let metadata = passages
            .iter()
            .map(|p| PassageMeta {
                filename: p.source_document_id.clone(),
                text: p.text.clone(),
            })
            .collect();

        let index = Self::from_parts(vectors, metadata)?;
        info!(vectors = index.len(), dim = index.dim, "passage embeddings created");
        Ok(index)
    }

    /// Like [`VectorIndex::try_build`], but an unavailable or failing
    /// provider yields an empty index so callers fall back to keywords.
    pub async fn build(passages: &[Passage], provider: &dyn EmbeddingsProvider) -> Self {
        if !provider.is_available() {
            debug!("embedding provider unavailable; skipping vector index");
            return Self::empty();
        }
        match Self::try_build(passages, provider).await {
            Ok(index) => index,
            Err(err) => {
                warn!(error = %err, "vector index build failed; using keyword matching");
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn metadata(&self, index: usize) -> Option<&PassageMeta> {
        self.metadata.get(index)
    }

    /// Top `top_k` passages above [`DEFAULT_SIMILARITY_THRESHOLD`].
    pub fn query(&self, question: &[f32], top_k: usize) -> Result<Vec<ScoredIndex>, StoreError> {
        self.query_above(question, top_k, DEFAULT_SIMILARITY_THRESHOLD)
    }

    /// Selects the `top_k` most similar passages, strictly descending by
    /// similarity (ties by ascending index), then keeps only those with
    /// similarity strictly greater than `threshold`. Non-finite scores (from a
    /// NaN or infinite question vector) never take a slot.
    ///
    /// # Errors
    /// `VectorSizeMismatch` if the question vector has the wrong dimension.
    pub fn query_above(
        &self,
        question: &[f32],
        top_k: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredIndex>, StoreError> {
        if self.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        if question.len() != self.dim {
            return Err(StoreError::VectorSizeMismatch {
                got: question.len(),
                want: self.dim,
            });
        }

        let q = normalized(question.to_vec());
        let mut scored: Vec<ScoredIndex> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, v)| ScoredIndex {
                index,
                similarity: dot(&q, v),
            })
            .filter(|s| s.similarity.is_finite())
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then(a.index.cmp(&b.index))
        });
        scored.truncate(top_k);
        scored.retain(|s| s.similarity > threshold);

        debug!(hits = scored.len(), top_k, threshold, "vector query");
        Ok(scored)
    }
}

/// Unit-length copy; zero vectors stay zero (similarity 0 with anything).
fn normalized(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

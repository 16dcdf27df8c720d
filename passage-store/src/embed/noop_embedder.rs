use crate::embed::{EmbedFuture, EmbeddingsProvider};
use crate::errors::StoreError;

/// Stand-in used when no embedding backend is configured or reachable.
#[derive(Clone, Debug, Default)]
pub struct NoopEmbedder;

impl EmbeddingsProvider for NoopEmbedder {
    fn is_available(&self) -> bool {
        false
    }

    fn embed_batch<'a>(&'a self, _texts: &'a [String]) -> EmbedFuture<'a> {
        Box::pin(async {
            Err(StoreError::Embedding(
                "no embedding provider is available".into(),
            ))
        })
    }
}

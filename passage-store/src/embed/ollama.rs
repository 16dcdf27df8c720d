//! Ollama embedding provider backed by [`EmbeddingService`].

use std::sync::Arc;

use embedding_service::EmbeddingService;
use tracing::debug;

use crate::embed::{EmbedFuture, EmbeddingsProvider};

/// Adapter from the shared [`EmbeddingService`] to [`EmbeddingsProvider`].
#[derive(Clone)]
pub struct OllamaEmbedder {
    svc: Arc<EmbeddingService>,
}

impl OllamaEmbedder {
    pub fn new(svc: Arc<EmbeddingService>) -> Self {
        Self { svc }
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn is_available(&self) -> bool {
        self.svc.is_available()
    }

    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a> {
        Box::pin(async move {
            debug!(model = %self.svc.model(), texts = texts.len(), "embedding batch");
            Ok(self.svc.embed_batch(texts).await?)
        })
    }
}

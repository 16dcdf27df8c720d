//! Embedding provider abstraction.

use std::{future::Future, pin::Pin};

use crate::errors::StoreError;

pub mod noop_embedder;
pub mod ollama;

/// Boxed future returned by [`EmbeddingsProvider::embed_batch`].
pub type EmbedFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, StoreError>> + Send + 'a>>;

/// Provider interface for embedding generation.
///
/// Async because real providers (Ollama, OpenAI, ...) perform HTTP requests.
/// Availability is decided once when the provider is constructed; callers
/// check [`EmbeddingsProvider::is_available`] instead of probing with a call.
pub trait EmbeddingsProvider: Send + Sync {
    /// Whether semantic search can be served at all.
    fn is_available(&self) -> bool;

    /// One vector per input text, in input order.
    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a>;
}

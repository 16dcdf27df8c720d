//! Fakes for the extractor and embedding collaborators.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::embed::{EmbedFuture, EmbeddingsProvider};
use crate::errors::ExtractError;
use crate::extract::{ExtractFuture, TextExtractor};

/// Reads files as UTF-8; a file starting with `FAIL` fails to extract.
#[derive(Default)]
pub struct PlainTextExtractor {
    pub calls: AtomicUsize,
}

impl PlainTextExtractor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract<'a>(&'a self, path: &'a Path) -> ExtractFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = tokio::fs::read_to_string(path).await?;
            if text.starts_with("FAIL") {
                return Err(ExtractError::Failed("unreadable".into()));
            }
            Ok(text)
        })
    }
}

/// Embeds each text with a plain function and counts batch calls.
pub struct FnEmbedder {
    embed: fn(&str) -> Vec<f32>,
    pub calls: AtomicUsize,
}

impl FnEmbedder {
    pub fn new(embed: fn(&str) -> Vec<f32>) -> Self {
        Self {
            embed,
            calls: AtomicUsize::new(0),
        }
    }

    /// `[count('a'), count('e') + 1]`; never the zero vector.
    pub fn letters() -> Self {
        Self::new(|t| {
            vec![
                t.matches('a').count() as f32,
                t.matches('e').count() as f32 + 1.0,
            ]
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingsProvider for FnEmbedder {
    fn is_available(&self) -> bool {
        true
    }

    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| (self.embed)(t)).collect())
        })
    }
}

pub fn write(dir: &Path, name: &str, text: &str) {
    std::fs::write(dir.join(name), text).expect("write fixture");
}

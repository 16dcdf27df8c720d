//! In-memory question answering over a folder of PDFs.
//!
//! This crate provides:
//! - Sentence-bounded passage splitting and a keyword matcher
//! - A cosine-similarity [`VectorIndex`] built through an [`EmbeddingsProvider`]
//! - A [`CorpusCache`] that owns the current [`CorpusSnapshot`] and swaps it atomically
//! - A [`Retriever`] that answers questions from whatever is loaded
//!
//! [`PassageStore`] wires these together and is the entry point for application code.

pub mod cache;
pub mod config;
pub mod embed;
pub mod errors;
pub mod extract;
pub mod keyword;
pub mod record;
pub mod retriever;
pub mod snapshot;
pub mod splitter;
pub mod vector_index;

#[cfg(test)]
mod test_support;

use std::path::Path;
use std::sync::Arc;

pub use cache::CorpusCache;
pub use config::StoreConfig;
pub use embed::{EmbeddingsProvider, noop_embedder::NoopEmbedder, ollama::OllamaEmbedder};
pub use errors::{ExtractError, StoreError};
pub use extract::{PdfTextExtractor, TextExtractor};
pub use record::{Document, Passage};
pub use retriever::{Answer, AnswerKind, Retriever, Source};
pub use snapshot::CorpusSnapshot;
pub use vector_index::VectorIndex;

use tracing::{debug, trace};

/// Facade over the corpus cache and the retriever.
#[derive(Clone)]
pub struct PassageStore {
    cache: Arc<CorpusCache>,
    retriever: Retriever,
}

impl PassageStore {
    pub fn new(
        cfg: StoreConfig,
        extractor: Arc<dyn TextExtractor>,
        provider: Arc<dyn EmbeddingsProvider>,
    ) -> Self {
        trace!(folder = %cfg.default_folder.display(), "PassageStore::new");
        let cache = Arc::new(CorpusCache::new(cfg, extractor, provider));
        let retriever = Retriever::new(Arc::clone(&cache));
        Self { cache, retriever }
    }

    pub fn cache(&self) -> &CorpusCache {
        &self.cache
    }

    pub fn supports_extraction(&self) -> bool {
        self.cache.supports_extraction()
    }

    pub fn supports_semantic_search(&self) -> bool {
        self.cache.supports_semantic_search()
    }

    /// Answers a question from the loaded corpus (loading the default folder
    /// on first use).
    ///
    /// # Errors
    /// `EmptyQuestion` for blank input; I/O errors from a first load.
    pub async fn ask(&self, question: &str) -> Result<Answer, StoreError> {
        self.retriever.answer(question).await
    }

    /// Loads the default folder unless something is already loaded.
    ///
    /// # Errors
    /// I/O errors listing or creating the folder.
    pub async fn preload(&self) -> Result<Arc<CorpusSnapshot>, StoreError> {
        self.cache.ensure_loaded(None).await
    }

    /// Re-reads the default folder from disk, switching back to it if another
    /// folder was loaded.
    ///
    /// # Errors
    /// I/O errors; the previous corpus stays loaded.
    pub async fn reload(&self) -> Result<Arc<CorpusSnapshot>, StoreError> {
        self.cache.force_reload().await
    }

    /// Replaces the corpus with the PDFs of `folder`.
    ///
    /// # Errors
    /// `InvalidFolder` if `folder` is missing or not a directory, I/O errors
    /// otherwise; the previous corpus stays loaded.
    pub async fn load_folder(&self, folder: &Path) -> Result<Arc<CorpusSnapshot>, StoreError> {
        self.cache.load_folder(folder).await
    }

    /// PDF file names currently on disk in the default folder, without loading
    /// them. A missing folder lists as empty.
    ///
    /// # Errors
    /// I/O errors other than the folder being absent.
    pub async fn pdf_files(&self) -> Result<Vec<String>, StoreError> {
        let folder = &self.cache.config().default_folder;
        if !tokio::fs::try_exists(folder).await? {
            debug!(folder = %folder.display(), "default folder does not exist");
            return Ok(Vec::new());
        }
        extract::list_pdf_files(folder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{PlainTextExtractor, write};

    fn store(folder: &Path) -> PassageStore {
        PassageStore::new(
            StoreConfig::new_default(folder),
            Arc::new(PlainTextExtractor::default()),
            Arc::new(NoopEmbedder),
        )
    }

    #[tokio::test]
    async fn pdf_files_does_not_load_or_create() {
        let root = tempfile::tempdir().expect("tempdir");
        let folder = root.path().join("pdfs");
        let s = store(&folder);

        assert!(s.pdf_files().await.expect("list").is_empty());
        assert!(!folder.exists());
        assert!(s.cache().current().await.is_none());
    }

    #[tokio::test]
    async fn pdf_files_lists_the_default_folder_after_a_switch() {
        let default = tempfile::tempdir().expect("tempdir");
        let other = tempfile::tempdir().expect("tempdir");
        write(default.path(), "a.pdf", "Default folder document text.");
        write(other.path(), "z.pdf", "Other folder document text.");
        let s = store(default.path());

        assert_eq!(s.pdf_files().await.expect("list"), vec!["a.pdf"]);
        s.load_folder(other.path()).await.expect("load");
        assert_eq!(s.pdf_files().await.expect("list"), vec!["a.pdf"]);
    }

    #[tokio::test]
    async fn reload_after_switch_returns_to_the_default_folder() {
        let default = tempfile::tempdir().expect("tempdir");
        let other = tempfile::tempdir().expect("tempdir");
        write(default.path(), "a.pdf", "Default folder document text.");
        write(other.path(), "z.pdf", "Other folder document text.");
        let s = store(default.path());

        s.load_folder(other.path()).await.expect("load");
        write(default.path(), "b.pdf", "A second document in the default folder.");
        let snap = s.reload().await.expect("reload");
        assert_eq!(snap.folder(), default.path());
        assert_eq!(snap.filenames(), vec!["a.pdf", "b.pdf"]);

        let current = s.cache().current().await.expect("loaded");
        assert!(Arc::ptr_eq(&snap, &current));
    }
}

//! Document text extraction and PDF discovery.

use std::{future::Future, path::Path, pin::Pin};

use tracing::debug;

use crate::errors::{ExtractError, StoreError};

/// Boxed future returned by [`TextExtractor::extract`].
pub type ExtractFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ExtractError>> + Send + 'a>>;

/// Turns one file into plain text.
///
/// Failures are per-file; the cache logs them and indexes the file with
/// empty text.
pub trait TextExtractor: Send + Sync {
    /// Whether this extractor can read anything at all (reported by `/health`).
    fn is_supported(&self) -> bool {
        true
    }

    fn extract<'a>(&'a self, path: &'a Path) -> ExtractFuture<'a>;
}

/// Text layer extraction via `pdf-extract`, on the blocking pool.
#[derive(Clone, Debug, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract<'a>(&'a self, path: &'a Path) -> ExtractFuture<'a> {
        Box::pin(async move {
            debug!(path = %path.display(), "extracting pdf text");
            let bytes = tokio::fs::read(path).await?;

            // pdf-extract may panic on malformed input; a panic surfaces as a
            // JoinError and is reported like any other per-file failure.
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| ExtractError::Failed(format!("extraction task failed: {e}")))?
                .map_err(|e| ExtractError::Failed(e.to_string()))
        })
    }
}

/// True for names ending in `.pdf`, any case.
pub fn is_pdf_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// PDF file names directly inside `dir` (not recursive), sorted.
///
/// # Errors
/// Any I/O error from reading the directory.
pub async fn list_pdf_files(dir: &Path) -> Result<Vec<String>, StoreError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_pdf_name(name) {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}

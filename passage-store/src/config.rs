//! Indexing and retrieval configuration.

use std::path::PathBuf;

use crate::errors::StoreError;

/// Knobs for splitting, indexing and querying a corpus folder.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreConfig {
    /// Folder used when no explicit folder was requested.
    pub default_folder: PathBuf,
    /// Target maximum passage length in characters.
    pub max_passage_len: usize,
    /// Passages with `len <= min_passage_len` are not indexed.
    pub min_passage_len: usize,
    /// Results returned per question.
    pub top_k: usize,
    /// Semantic hits must score strictly above this cosine similarity.
    pub similarity_threshold: f32,
}

impl StoreConfig {
    /// Defaults for a given corpus folder.
    pub fn new_default(default_folder: impl Into<PathBuf>) -> Self {
        Self {
            default_folder: default_folder.into(),
            max_passage_len: 500,
            min_passage_len: 20,
            top_k: 3,
            similarity_threshold: 0.2,
        }
    }

    /// Reads overrides from the environment.
    ///
    /// - `PDF_DIRECTORY` (default `./pdfs`)
    /// - `PASSAGE_MAX_LENGTH` (500), `MIN_PASSAGE_LENGTH` (20)
    /// - `RETRIEVAL_TOP_K` (3), `SIMILARITY_THRESHOLD` (0.2)
    ///
    /// # Errors
    /// Returns `StoreError::Config` when a variable is set but malformed, or
    /// when the resulting values fail [`StoreConfig::validate`].
    pub fn from_env() -> Result<Self, StoreError> {
        let folder = env("PDF_DIRECTORY").unwrap_or_else(|| "./pdfs".to_string());
        let defaults = Self::new_default(folder);

        let cfg = Self {
            max_passage_len: parse("PASSAGE_MAX_LENGTH", defaults.max_passage_len)?,
            min_passage_len: parse("MIN_PASSAGE_LENGTH", defaults.min_passage_len)?,
            top_k: parse("RETRIEVAL_TOP_K", defaults.top_k)?,
            similarity_threshold: parse("SIMILARITY_THRESHOLD", defaults.similarity_threshold)?,
            ..defaults
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.default_folder.as_os_str().is_empty() {
            return Err(StoreError::Config("default folder is empty".into()));
        }
        if self.max_passage_len == 0 {
            return Err(StoreError::Config("max_passage_len must be > 0".into()));
        }
        if self.top_k == 0 {
            return Err(StoreError::Config("top_k must be > 0".into()));
        }
        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(StoreError::Config(
                "similarity_threshold must lie in [-1, 1]".into(),
            ));
        }
        Ok(())
    }
}

fn env(k: &str) -> Option<String> {
    std::env::var(k).ok().filter(|v| !v.trim().is_empty())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> Result<T, StoreError> {
    match env(k) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| StoreError::Config(format!("{k} has an invalid value: {v}"))),
        None => Ok(dflt),
    }
}

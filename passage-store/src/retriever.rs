//! Question answering over the current corpus snapshot.
//!
//! Semantic ranking is used whenever the snapshot carries a populated vector
//! index; otherwise (or if the question cannot be embedded) keyword matching
//! answers instead.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::CorpusCache;
use crate::errors::StoreError;
use crate::keyword;
use crate::snapshot::CorpusSnapshot;
use crate::vector_index::{VectorIndex, confidence};

pub const NO_CORPUS_MESSAGE: &str =
    "No PDF files are currently loaded. Please load PDFs from a folder first.";
pub const NO_MATCHES_MESSAGE: &str =
    "No matching content found for your question. Try rephrasing or asking a different question.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Nothing is indexed.
    NoCorpus,
    /// Corpus present, nothing relevant.
    NoMatches,
    Found,
}

/// One ranked passage or document excerpt backing an answer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Source {
    pub filename: String,
    pub content: String,
    /// Semantic hits: similarity as a percentage, one decimal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Keyword hits: share of question keywords found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Answer {
    pub kind: AnswerKind,
    pub answer: String,
    pub sources: Vec<Source>,
    /// Score of the first source, `0` when there is none.
    pub top_score: f32,
}

impl Answer {
    fn message(kind: AnswerKind, message: &str) -> Self {
        Self {
            kind,
            answer: message.to_string(),
            sources: Vec::new(),
            top_score: 0.0,
        }
    }

    fn from_sources(sources: Vec<Source>) -> Self {
        let Some(first) = sources.first() else {
            return Self::message(AnswerKind::NoMatches, NO_MATCHES_MESSAGE);
        };
        let top_score = first.confidence.or(first.match_score).unwrap_or(0.0);

        let answer = sources
            .iter()
            .map(|s| match s.confidence {
                Some(c) => format!("From {} [{c:.1}% confidence]:\n{}", s.filename, s.content),
                None => format!("From {}:\n{}", s.filename, s.content),
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        Self {
            kind: AnswerKind::Found,
            answer,
            sources,
            top_score,
        }
    }
}

/// Query façade over a [`CorpusCache`].
#[derive(Clone)]
pub struct Retriever {
    cache: Arc<CorpusCache>,
}

impl Retriever {
    pub fn new(cache: Arc<CorpusCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<CorpusCache> {
        &self.cache
    }

    /// Answers `question` from the current corpus, loading it if needed.
    ///
    /// # Errors
    /// `EmptyQuestion` for blank input; I/O errors from a first load.
    pub async fn answer(&self, question: &str) -> Result<Answer, StoreError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(StoreError::EmptyQuestion);
        }

        let snapshot = self.cache.ensure_loaded(None).await?;
        if snapshot.is_empty() {
            info!("question asked with no corpus loaded");
            return Ok(Answer::message(AnswerKind::NoCorpus, NO_CORPUS_MESSAGE));
        }

        let sources = match snapshot.index() {
            Some(index) => match self.semantic(question, index).await {
                Ok(sources) => sources,
                Err(err) => {
                    warn!(error = %err, "semantic search failed; using keyword matching");
                    self.keyword(question, &snapshot)
                }
            },
            None => self.keyword(question, &snapshot),
        };

        let answer = Answer::from_sources(sources);
        debug!(kind = ?answer.kind, sources = answer.sources.len(), top = answer.top_score, "answered");
        Ok(answer)
    }

    async fn semantic(&self, question: &str, index: &VectorIndex) -> Result<Vec<Source>, StoreError> {
        let cfg = self.cache.config();
        let texts = [question.to_string()];
        let vectors = self.cache.provider().embed_batch(&texts).await?;
        let [q]: [Vec<f32>; 1] = vectors
            .try_into()
            .map_err(|v: Vec<Vec<f32>>| StoreError::VectorSizeMismatch { got: v.len(), want: 1 })?;

        let hits = index.query_above(&q, cfg.top_k, cfg.similarity_threshold)?;
        Ok(hits
            .into_iter()
            .filter_map(|hit| {
                let meta = index.metadata(hit.index)?;
                Some(Source {
                    filename: meta.filename.clone(),
                    content: meta.text.clone(),
                    confidence: Some(confidence(hit.similarity)),
                    match_score: None,
                })
            })
            .collect())
    }

    fn keyword(&self, question: &str, snapshot: &CorpusSnapshot) -> Vec<Source> {
        keyword::find_matches(question, snapshot.documents())
            .into_iter()
            .take(self.cache.config().top_k)
            .map(|m| Source {
                filename: m.filename,
                content: m.content,
                confidence: None,
                match_score: Some(m.match_score),
            })
            .collect()
    }
}

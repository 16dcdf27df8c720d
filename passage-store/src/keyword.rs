//! Keyword matching fallback used when no embedding provider is available.
//!
//! The question is reduced to lowercase content words; each document is
//! scored by the fraction of those words it contains, and the first few
//! sentences mentioning a matched word become the excerpt.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::record::Document;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]+").expect("word regex"));

/// Excerpt sentences kept per document.
const MAX_EXCERPT_SENTENCES: usize = 3;

const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "all", "also", "and", "any", "are", "because", "been",
    "before", "being", "between", "both", "but", "can", "could", "did", "does", "doing", "down",
    "during", "each", "few", "for", "from", "further", "had", "has", "have", "having", "her",
    "here", "hers", "him", "his", "how", "into", "its", "itself", "just", "more", "most", "not",
    "now", "off", "once", "only", "other", "our", "ours", "out", "over", "own", "same", "she",
    "should", "some", "such", "than", "that", "the", "their", "theirs", "them", "then", "there",
    "these", "they", "this", "those", "through", "too", "under", "until", "very", "was", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
    "you", "your", "yours", "tell", "please", "know", "explain", "describe",
];

static STOP_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

/// One document's keyword hit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub filename: String,
    /// Up to three sentences mentioning a matched keyword.
    pub content: String,
    /// `matched keywords / all keywords`, in `(0, 1]`.
    pub match_score: f32,
}

/// Content words of a question, in order of appearance, without duplicates.
///
/// Alphabetic runs of the lowercased question minus stop words and words of
/// two letters or fewer. If that leaves nothing, whitespace-separated tokens
/// with the same length filter are used instead.
pub fn extract_keywords(question: &str) -> Vec<String> {
    let lowered = question.to_lowercase();

    let mut keywords = dedup(
        WORD.find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|w| w.chars().count() > 2 && !STOP_SET.contains(w)),
    );

    if keywords.is_empty() {
        keywords = dedup(
            lowered
                .split_whitespace()
                .filter(|w| w.chars().count() > 2),
        );
    }

    keywords
}

fn dedup<'a>(words: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .filter(|w| seen.insert(*w))
        .map(str::to_string)
        .collect()
}

/// Scores every document against the question.
///
/// Results are sorted by `match_score` descending; ties keep document order.
/// An empty vector means "no match", including when the question has no
/// usable keywords.
pub fn find_matches<'a, I>(question: &str, documents: I) -> Vec<KeywordMatch>
where
    I: IntoIterator<Item = &'a Document>,
{
    let keywords = extract_keywords(question);
    if keywords.is_empty() {
        debug!("keyword search: question has no usable keywords");
        return Vec::new();
    }
    trace!(?keywords, "keyword search");

    let mut results: Vec<KeywordMatch> = documents
        .into_iter()
        .filter(|doc| !doc.text.is_empty())
        .filter_map(|doc| match_document(doc, &keywords))
        .collect();

    // `sort_by` is stable, so equal scores stay in document order.
    results.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    results
}

fn match_document(doc: &Document, keywords: &[String]) -> Option<KeywordMatch> {
    let lowered = doc.text.to_lowercase();
    let matched: Vec<&str> = keywords
        .iter()
        .map(String::as_str)
        .filter(|k| lowered.contains(k))
        .collect();

    if matched.is_empty() {
        return None;
    }

    let flattened = doc.text.replace(['\r', '\n'], " ");
    let sentences: Vec<&str> = flattened
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| {
            let s = s.to_lowercase();
            matched.iter().any(|k| s.contains(k))
        })
        .take(MAX_EXCERPT_SENTENCES)
        .collect();

    let mut content = sentences.join(". ");
    if !content.is_empty() && !content.ends_with(['.', '!', '?']) {
        content.push('.');
    }

    Some(KeywordMatch {
        filename: doc.id.clone(),
        content,
        match_score: matched.len() as f32 / keywords.len() as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_words_and_short_tokens_are_dropped() {
        assert_eq!(
            extract_keywords("What is the refund policy?"),
            vec!["refund", "policy"]
        );
    }

    #[test]
    fn repeated_words_count_once() {
        assert_eq!(extract_keywords("refund refund REFUND"), vec!["refund"]);
    }

    #[test]
    fn falls_back_to_whitespace_tokens() {
        // Only stop words survive the alphabetic pass.
        assert_eq!(extract_keywords("what about them"), vec!["what", "about", "them"]);
        // Digits never match `[a-z]+`.
        assert_eq!(extract_keywords("2024 42"), vec!["2024"]);
    }

    #[test]
    fn no_keywords_means_no_matches() {
        let docs = vec![Document::new("a.pdf", "is it ok")];
        assert!(extract_keywords("is it ?").is_empty());
        assert!(find_matches("is it ?", &docs).is_empty());
    }

    #[test]
    fn refund_question_matches_refund_sentence() {
        let docs = vec![Document::new(
            "policy.pdf",
            "Refunds are processed within 30 days.",
        )];
        let hits = find_matches("What is the refund policy?", &docs);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].filename, "policy.pdf");
        assert_eq!(hits[0].content, "Refunds are processed within 30 days.");
        assert!((hits[0].match_score - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn excerpt_is_capped_at_three_sentences() {
        let text = "Cats purr.\nDogs bark. Cats sleep. Birds sing. Cats hunt. Cats climb";
        let docs = vec![Document::new("pets.pdf", text)];
        let hits = find_matches("cats", &docs);
        assert_eq!(hits[0].content, "Cats purr. Cats sleep. Cats hunt.");
    }

    #[test]
    fn results_are_sorted_and_ties_keep_document_order() {
        let docs = vec![
            Document::new("a.pdf", "Shipping takes a week."),
            Document::new("b.pdf", "Refund and shipping rules apply."),
            Document::new("c.pdf", "Free shipping on large orders."),
            Document::new("d.pdf", ""),
            Document::new("e.pdf", "Nothing relevant."),
        ];
        let hits = find_matches("refund shipping", &docs);
        let names: Vec<&str> = hits.iter().map(|h| h.filename.as_str()).collect();
        assert_eq!(names, vec!["b.pdf", "a.pdf", "c.pdf"]);
        for h in &hits {
            assert!(h.match_score > 0.0 && h.match_score <= 1.0);
        }
        assert!(hits.windows(2).all(|w| w[0].match_score >= w[1].match_score));
    }

    #[test]
    fn existing_terminal_punctuation_is_kept() {
        let docs = vec![Document::new("q.pdf", "Is shipping free? Maybe")];
        let hits = find_matches("shipping", &docs);
        assert_eq!(hits[0].content, "Is shipping free? Maybe.");
    }
}

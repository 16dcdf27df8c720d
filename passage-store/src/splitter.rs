//! Sentence-bounded passage splitting.
//!
//! Text is cut into sentences at `.`, `!` or `?` followed by whitespace, and
//! sentences are packed greedily into passages of at most `max_len`
//! characters. A sentence longer than `max_len` is kept whole as its own
//! passage; nothing is ever cut mid-sentence.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::record::{Document, Passage};

/// Terminal punctuation followed by a whitespace run.
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("sentence boundary regex"));

/// Default maximum passage length in characters.
pub const DEFAULT_MAX_PASSAGE_LEN: usize = 500;

/// Splits `text` into trimmed, non-empty sentences.
///
/// The terminal punctuation stays with its sentence; the whitespace after it
/// is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;

    for m in SENTENCE_BOUNDARY.find_iter(text) {
        // The punctuation mark is a single ASCII byte.
        push_trimmed(&mut out, &text[start..m.start() + 1]);
        start = m.end();
    }
    push_trimmed(&mut out, &text[start..]);

    out
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, sentence: &'a str) {
    let s = sentence.trim();
    if !s.is_empty() {
        out.push(s);
    }
}

/// Packs sentences into passages of at most `max_len` characters.
///
/// A sentence is appended (space-joined) while the passage stays within
/// `max_len`; otherwise the current passage is flushed and the sentence
/// starts a new one. Deterministic; never yields an empty passage.
pub fn split_passages(text: &str, max_len: usize) -> Vec<String> {
    let mut passages = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in split_sentences(text) {
        let sentence_len = sentence.chars().count();

        if current.is_empty() {
            current.push_str(sentence);
            current_len = sentence_len;
        } else if current_len + 1 + sentence_len > max_len {
            passages.push(std::mem::take(&mut current));
            current.push_str(sentence);
            current_len = sentence_len;
        } else {
            current.push(' ');
            current.push_str(sentence);
            current_len += 1 + sentence_len;
        }
    }

    if !current.is_empty() {
        passages.push(current);
    }

    trace!(passages = passages.len(), max_len, "split_passages");
    passages
}

/// Passages worth indexing for a set of documents, in document order.
///
/// Documents with empty text are skipped; passages of `min_len` characters or
/// fewer are dropped to keep noise out of the index.
pub fn indexable_passages<'a, I>(documents: I, max_len: usize, min_len: usize) -> Vec<Passage>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut out = Vec::new();
    for doc in documents {
        if doc.text.trim().is_empty() {
            continue;
        }
        out.extend(
            split_passages(&doc.text, max_len)
                .into_iter()
                .filter(|p| p.chars().count() > min_len)
                .map(|text| Passage {
                    source_document_id: doc.id.clone(),
                    text,
                }),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentences_keep_their_punctuation() {
        let s = split_sentences("Hello there. How are you?  Fine!\nBye");
        assert_eq!(s, vec!["Hello there.", "How are you?", "Fine!", "Bye"]);
    }

    #[test]
    fn abbreviations_without_whitespace_do_not_split() {
        assert_eq!(split_sentences("Version 1.2 is out."), vec!["Version 1.2 is out."]);
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert!(split_passages("", 500).is_empty());
        assert!(split_passages("   \n\t ", 500).is_empty());
    }

    #[test]
    fn short_text_is_one_passage() {
        let p = split_passages("One. Two. Three.", 500);
        assert_eq!(p, vec!["One. Two. Three."]);
    }

    #[test]
    fn passages_respect_max_len() {
        let text = "Alpha beta gamma. Delta epsilon zeta. Eta theta iota. Kappa lambda mu.";
        let passages = split_passages(text, 36);
        assert_eq!(
            passages,
            vec![
                "Alpha beta gamma.",
                "Delta epsilon zeta. Eta theta iota.",
                "Kappa lambda mu.",
            ]
        );
        for p in &passages {
            assert!(p.chars().count() <= 36, "{p:?} exceeds max");
        }
    }

    #[test]
    fn oversized_sentence_stays_whole() {
        let long = format!("{}.", "x".repeat(80));
        let text = format!("Short one. {long} Tail.");
        let passages = split_passages(&text, 40);
        assert_eq!(passages, vec!["Short one.".to_string(), long, "Tail.".to_string()]);
    }

    #[test]
    fn joining_space_counts_toward_the_limit() {
        // 5 + 1 + 5 = 11 > 10, so the second sentence starts a new passage.
        let passages = split_passages("Aaaa. Bbbb.", 10);
        assert_eq!(passages, vec!["Aaaa.", "Bbbb."]);
        let passages = split_passages("Aaaa. Bbbb.", 11);
        assert_eq!(passages, vec!["Aaaa. Bbbb."]);
    }

    #[test]
    fn every_sentence_appears_once_in_order() {
        let text = "First point here. Second point! Third point? Fourth and final point.";
        for max in [1usize, 10, 20, 40, 500] {
            let rebuilt: Vec<String> = split_passages(text, max)
                .iter()
                .flat_map(|p| split_sentences(p).into_iter().map(str::to_string).collect::<Vec<_>>())
                .collect();
            assert_eq!(rebuilt, split_sentences(text), "max={max}");
        }
    }

    #[test]
    fn lengths_are_counted_in_chars() {
        // 11 chars but 19 bytes.
        let passages = split_passages("éééé. éééé.", 11);
        assert_eq!(passages.len(), 1);
    }

    #[test]
    fn indexable_passages_drop_short_and_empty() {
        let docs = vec![
            Document::new("a.pdf", "Tiny. This sentence is comfortably long enough to index."),
            Document::new("empty.pdf", ""),
        ];
        let passages = indexable_passages(&docs, 10, 20);
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].source_document_id, "a.pdf");
        assert_eq!(
            passages[0].text,
            "This sentence is comfortably long enough to index."
        );
    }
}

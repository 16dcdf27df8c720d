//! Core data models used by the library.

/// Extracted text of one source file.
///
/// `text` is empty when extraction failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// File name inside the corpus folder (e.g. `handbook.pdf`).
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A bounded excerpt of a document; the unit of retrieval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Passage {
    /// Id of the [`Document`] this passage was cut from.
    pub source_document_id: String,
    pub text: String,
}

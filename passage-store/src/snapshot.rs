//! Immutable result of one indexing pass over a folder.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::record::Document;
use crate::vector_index::VectorIndex;

/// Folder, extracted documents and (optionally) their vector index.
///
/// Built once by [`crate::cache::CorpusCache`] and shared as
/// `Arc<CorpusSnapshot>`; a reload produces a new value instead of editing
/// this one.
#[derive(Debug)]
pub struct CorpusSnapshot {
    folder: PathBuf,
    documents: BTreeMap<String, Document>,
    index: Option<VectorIndex>,
}

impl CorpusSnapshot {
    pub fn new(
        folder: impl Into<PathBuf>,
        documents: impl IntoIterator<Item = Document>,
        index: Option<VectorIndex>,
    ) -> Self {
        Self {
            folder: folder.into(),
            documents: documents
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
            // An empty index is the same as none for every reader.
            index: index.filter(|i| !i.is_empty()),
        }
    }

    /// Snapshot of a folder with no documents.
    pub fn empty(folder: impl Into<PathBuf>) -> Self {
        Self::new(folder, Vec::new(), None)
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Documents in filename order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// File names in filename order.
    pub fn filenames(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    pub fn document(&self, filename: &str) -> Option<&Document> {
        self.documents.get(filename)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Populated vector index, if semantic search is possible.
    pub fn index(&self) -> Option<&VectorIndex> {
        self.index.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_index::PassageMeta;

    #[test]
    fn documents_iterate_by_filename() {
        let snap = CorpusSnapshot::new(
            "/tmp/docs",
            vec![
                Document::new("b.pdf", "second"),
                Document::new("a.pdf", "first"),
            ],
            None,
        );
        assert_eq!(snap.filenames(), vec!["a.pdf", "b.pdf"]);
        assert_eq!(snap.document("b.pdf").map(|d| d.text.as_str()), Some("second"));
        assert_eq!(snap.folder(), Path::new("/tmp/docs"));
    }

    #[test]
    fn empty_index_is_dropped() {
        let snap = CorpusSnapshot::new("x", vec![Document::new("a.pdf", "t")], Some(VectorIndex::empty()));
        assert!(snap.index().is_none());

        let index = VectorIndex::from_parts(
            vec![vec![1.0]],
            vec![PassageMeta {
                filename: "a.pdf".into(),
                text: "t".into(),
            }],
        )
        .expect("index");
        let snap = CorpusSnapshot::new("x", vec![Document::new("a.pdf", "t")], Some(index));
        assert_eq!(snap.index().map(VectorIndex::len), Some(1));
    }

    #[test]
    fn empty_snapshot_has_no_documents() {
        let snap = CorpusSnapshot::empty("pdfs");
        assert!(snap.is_empty());
        assert_eq!(snap.document_count(), 0);
    }
}

//! Owner of the current corpus snapshot.
//!
//! One slot holds `Option<Arc<CorpusSnapshot>>`. Readers clone the `Arc` under
//! a short read lock; rebuilds are serialized by a separate async mutex and
//! only swap the slot once the new snapshot is complete, so a reader sees
//! either the previous corpus or the next one, never a mix.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::embed::EmbeddingsProvider;
use crate::errors::StoreError;
use crate::extract::{TextExtractor, list_pdf_files};
use crate::record::Document;
use crate::snapshot::CorpusSnapshot;
use crate::splitter::indexable_passages;
use crate::vector_index::VectorIndex;

pub struct CorpusCache {
    cfg: StoreConfig,
    extractor: Arc<dyn TextExtractor>,
    provider: Arc<dyn EmbeddingsProvider>,
    slot: RwLock<Option<Arc<CorpusSnapshot>>>,
    rebuild_lock: Mutex<()>,
}

impl CorpusCache {
    pub fn new(
        cfg: StoreConfig,
        extractor: Arc<dyn TextExtractor>,
        provider: Arc<dyn EmbeddingsProvider>,
    ) -> Self {
        Self {
            cfg,
            extractor,
            provider,
            slot: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.cfg
    }

    pub fn provider(&self) -> &dyn EmbeddingsProvider {
        self.provider.as_ref()
    }

    pub fn supports_extraction(&self) -> bool {
        self.extractor.is_supported()
    }

    pub fn supports_semantic_search(&self) -> bool {
        self.provider.is_available()
    }

    /// Current snapshot without loading anything.
    pub async fn current(&self) -> Option<Arc<CorpusSnapshot>> {
        self.slot.read().await.clone()
    }

    /// Folder of the current snapshot, or the default folder when unloaded.
    pub async fn active_folder(&self) -> PathBuf {
        match self.current().await {
            Some(snap) => snap.folder().to_path_buf(),
            None => self.cfg.default_folder.clone(),
        }
    }

    /// Returns the cached snapshot, building one first if needed.
    ///
    /// With `folder == None` any loaded snapshot is reused; with an explicit
    /// folder the cached snapshot is reused only if it was built from that
    /// same folder.
    ///
    /// # Errors
    /// `InvalidFolder` for a missing explicit folder, `Io` when the folder
    /// cannot be listed or created. The previous snapshot stays in place.
    pub async fn ensure_loaded(
        &self,
        folder: Option<&Path>,
    ) -> Result<Arc<CorpusSnapshot>, StoreError> {
        if let Some(snap) = self.cached_for(folder).await {
            debug!(folder = %snap.folder().display(), "corpus cache hit");
            return Ok(snap);
        }

        let _guard = self.rebuild_lock.lock().await;
        // Another caller may have finished a rebuild while we waited.
        if let Some(snap) = self.cached_for(folder).await {
            debug!(folder = %snap.folder().display(), "corpus cache hit after wait");
            return Ok(snap);
        }

        match folder {
            Some(f) => self.rebuild(f, true).await,
            None => self.rebuild(&self.cfg.default_folder, false).await,
        }
    }

    /// Rebuilds the default folder unconditionally, replacing whatever folder
    /// is loaded. A missing default folder is created, as on first load.
    pub async fn force_reload(&self) -> Result<Arc<CorpusSnapshot>, StoreError> {
        let _guard = self.rebuild_lock.lock().await;
        self.rebuild(&self.cfg.default_folder, false).await
    }

    /// Switches to `folder`, always rebuilding.
    pub async fn load_folder(&self, folder: &Path) -> Result<Arc<CorpusSnapshot>, StoreError> {
        let _guard = self.rebuild_lock.lock().await;
        self.rebuild(folder, true).await
    }

    async fn cached_for(&self, folder: Option<&Path>) -> Option<Arc<CorpusSnapshot>> {
        let slot = self.slot.read().await;
        let snap = slot.as_ref()?;
        match folder {
            Some(f) if snap.folder() != f => None,
            _ => Some(Arc::clone(snap)),
        }
    }

    /// Full indexing pass. Callers hold `self.rebuild_lock`.
    async fn rebuild(
        &self,
        folder: &Path,
        explicit: bool,
    ) -> Result<Arc<CorpusSnapshot>, StoreError> {
        info!(folder = %folder.display(), "loading corpus");

        if !tokio::fs::try_exists(folder).await? {
            if explicit {
                return Err(StoreError::InvalidFolder {
                    path: folder.to_path_buf(),
                    reason: "Folder does not exist",
                });
            }
            tokio::fs::create_dir_all(folder).await?;
            info!(folder = %folder.display(), "created missing corpus folder");
            return Ok(self.install(CorpusSnapshot::empty(folder)).await);
        }
        if !tokio::fs::metadata(folder).await?.is_dir() {
            return Err(StoreError::InvalidFolder {
                path: folder.to_path_buf(),
                reason: "Path is not a directory",
            });
        }

        let names = list_pdf_files(folder).await?;
        let mut documents = Vec::with_capacity(names.len());
        for name in names {
            let path = folder.join(&name);
            let text = match self.extractor.extract(&path).await {
                Ok(text) => text,
                Err(err) => {
                    warn!(file = %name, error = %err, "text extraction failed; indexing as empty");
                    String::new()
                }
            };
            documents.push(Document::new(name, text));
        }

        let passages = indexable_passages(
            &documents,
            self.cfg.max_passage_len,
            self.cfg.min_passage_len,
        );
        let index = VectorIndex::build(&passages, self.provider.as_ref()).await;

        info!(
            folder = %folder.display(),
            documents = documents.len(),
            passages = passages.len(),
            vectors = index.len(),
            "corpus loaded"
        );
        Ok(self
            .install(CorpusSnapshot::new(folder, documents, Some(index)))
            .await)
    }

    async fn install(&self, snapshot: CorpusSnapshot) -> Arc<CorpusSnapshot> {
        let snap = Arc::new(snapshot);
        *self.slot.write().await = Some(Arc::clone(&snap));
        snap
    }
}

use std::{error::Error, sync::Arc};

use api::{AppState, ServerConfig};
use embedding_service::{
    EmbeddingService, config::default_config::config_ollama_embedding, error_handler::env_opt_u64,
    telemetry,
};
use passage_store::{
    EmbeddingsProvider, NoopEmbedder, OllamaEmbedder, PassageStore, PdfTextExtractor, StoreConfig,
};
use tracing::{Level, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file when present.
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err.into());
        }
    }

    telemetry::init("info", Level::INFO)?;

    let server_cfg = ServerConfig::from_env();
    let store_cfg = StoreConfig::from_env()?;

    let provider: Arc<dyn EmbeddingsProvider> = match config_ollama_embedding()? {
        Some(cfg) => {
            let health_timeout = env_opt_u64("HEALTH_TIMEOUT_SECS")?;
            let svc = EmbeddingService::initialize(cfg, health_timeout).await?;
            Arc::new(OllamaEmbedder::new(Arc::new(svc)))
        }
        None => {
            warn!("no embedding backend configured (OLLAMA_URL/OLLAMA_PORT and EMBEDDING_MODEL); using keyword matching");
            Arc::new(NoopEmbedder)
        }
    };

    info!(
        folder = %store_cfg.default_folder.display(),
        semantic = provider.is_available(),
        "starting pdf qa server"
    );

    let store = PassageStore::new(store_cfg, Arc::new(PdfTextExtractor::new()), provider);
    match store.preload().await {
        Ok(snapshot) => info!(
            folder = %snapshot.folder().display(),
            pdfs = snapshot.document_count(),
            "corpus preloaded"
        ),
        Err(err) => warn!(error = %err, "corpus preload failed; will retry on first request"),
    }

    api::start(server_cfg, AppState::new(store)).await?;

    Ok(())
}

//! Shared embedding service with an explicit availability flag.
//!
//! - Construct once at startup with [`EmbeddingService::initialize`], wrap in `Arc`,
//!   and pass clones to dependents.
//! - Initialization probes the backend exactly once; the outcome is fixed for the
//!   lifetime of the service and exposed via [`EmbeddingService::is_available`].
//! - When unavailable, [`EmbeddingService::embed_batch`] fails fast with
//!   [`EmbeddingError::Unavailable`] instead of hitting the network.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use embedding_service::EmbeddingService;
//! use embedding_service::config::embedding_config::EmbeddingConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = EmbeddingConfig {
//!     model: "all-minilm".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     timeout_secs: Some(60),
//! };
//!
//! let svc = Arc::new(EmbeddingService::initialize(cfg, Some(10)).await?);
//! if svc.is_available() {
//!     let v = svc.embed_batch(&["Ferris".to_string()]).await?;
//!     println!("dim = {}", v[0].len());
//! }
//! # Ok(()) }
//! ```

use tracing::{info, warn};

use crate::{
    config::embedding_config::EmbeddingConfig,
    error_handler::{EmbeddingError, Result},
    health_service::{HealthService, HealthStatus},
    services::ollama_service::OllamaService,
};

/// Embedding client plus the result of its one-time startup probe.
pub struct EmbeddingService {
    client: OllamaService,
    status: HealthStatus,
}

impl EmbeddingService {
    /// Builds the client and probes the backend once.
    ///
    /// A failed probe is not an error: the service is returned with
    /// `is_available() == false` so callers can degrade to keyword search.
    ///
    /// # Errors
    /// Returns [`EmbeddingError`] only when the config itself is invalid or an
    /// HTTP client cannot be built.
    pub async fn initialize(cfg: EmbeddingConfig, health_timeout_secs: Option<u64>) -> Result<Self> {
        let client = OllamaService::new(cfg.clone())?;
        let health = HealthService::new(health_timeout_secs)?;
        let status = health.check(&cfg).await;

        if status.ok {
            info!(model = %cfg.model, endpoint = %status.endpoint, "semantic search enabled");
        } else {
            warn!(
                model = %cfg.model,
                endpoint = %status.endpoint,
                reason = %status.message,
                "semantic search disabled; falling back to keyword matching"
            );
        }

        Ok(Self { client, status })
    }

    /// Whether the startup probe succeeded.
    pub fn is_available(&self) -> bool {
        self.status.ok
    }

    /// Startup probe result.
    pub fn status(&self) -> &HealthStatus {
        &self.status
    }

    /// Model identifier.
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Embeds every input in one batch call, preserving order.
    ///
    /// # Errors
    /// [`EmbeddingError::Unavailable`] if the startup probe failed, otherwise
    /// any error from the underlying client.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if !self.is_available() {
            return Err(EmbeddingError::Unavailable);
        }
        self.client.embed_batch(inputs).await
    }
}

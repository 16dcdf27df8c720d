//! Thin Ollama client for batch embeddings.
//!
//! - `POST {endpoint}/api/embed` with `{ model, input: [..] }`
//!   returns `{ embeddings: [[..], ..] }`, one vector per input, in order.
//!
//! # Examples
//!
//! ```no_run
//! use embedding_service::config::embedding_config::EmbeddingConfig;
//! use embedding_service::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = EmbeddingConfig {
//!     model: "all-minilm".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     timeout_secs: Some(30),
//! };
//!
//! let svc = OllamaService::new(cfg)?;
//! let vectors = svc
//!     .embed_batch(&["Ferris is a friendly crab.".to_string()])
//!     .await?;
//! println!("dimension = {}", vectors[0].len());
//! # Ok(()) }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::default_config::DEFAULT_EMBEDDING_TIMEOUT_SECS;
use crate::config::embedding_config::EmbeddingConfig;
use crate::error_handler::{
    ConfigError, EmbeddingError, HealthError, Result, make_snippet, validate_http_endpoint,
};

/// Thin client for the Ollama embedding endpoint.
///
/// Reuses one HTTP client with the configured timeout.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: EmbeddingConfig,
    url_embed: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`HealthError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`ConfigError::EmptyModel`] if the model name is blank
    /// - [`EmbeddingError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: EmbeddingConfig) -> Result<Self> {
        if validate_http_endpoint("OLLAMA_URL", &cfg.endpoint).is_err() {
            return Err(HealthError::InvalidEndpoint(cfg.endpoint).into());
        }
        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let timeout = Duration::from_secs(
            cfg.timeout_secs
                .unwrap_or(DEFAULT_EMBEDDING_TIMEOUT_SECS),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        let url_embed = format!("{}/api/embed", cfg.base_url());

        Ok(Self {
            client,
            cfg,
            url_embed,
        })
    }

    /// Model this client embeds with.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Retrieves one embedding per input via `/api/embed`, preserving order.
    ///
    /// An empty input slice short-circuits to an empty result without a request.
    ///
    /// # Errors
    /// - [`EmbeddingError::HttpStatus`] for non-2xx responses
    /// - [`EmbeddingError::HttpTransport`] for client errors
    /// - [`EmbeddingError::Timeout`] when the configured timeout elapses
    /// - [`EmbeddingError::Decode`] if the response cannot be parsed or the
    ///   number of vectors differs from the number of inputs
    #[instrument(skip_all, fields(model = %self.cfg.model, inputs = inputs.len()))]
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let body = EmbedRequest {
            model: &self.cfg.model,
            input: inputs,
        };

        debug!("POST {}", self.url_embed);
        let resp = self
            .client
            .post(&self.url_embed)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embed.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        let out: EmbedResponse = resp.json().await.map_err(|e| {
            EmbeddingError::Decode(format!(
                "serde error: {e}; expected `{{ embeddings: number[][] }}`"
            ))
        })?;

        if out.embeddings.len() != inputs.len() {
            return Err(EmbeddingError::Decode(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                out.embeddings.len()
            )));
        }

        Ok(out.embeddings)
    }

    fn map_transport(&self, err: reqwest::Error) -> EmbeddingError {
        if err.is_timeout() {
            EmbeddingError::Timeout(Duration::from_secs(
                self.cfg
                    .timeout_secs
                    .unwrap_or(DEFAULT_EMBEDDING_TIMEOUT_SECS),
            ))
        } else {
            EmbeddingError::HttpTransport(err)
        }
    }
}

/* ==========================
HTTP payloads
========================== */

/// Request body for `/api/embed`.
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

/// Response body for `/api/embed`.
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

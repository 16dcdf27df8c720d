//! Health probe for the Ollama embedding backend.
//!
//! - `GET {endpoint}/api/tags`, then a best-effort check that the configured
//!   model is listed.
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a `/health`
//! endpoint. [`HealthService::check`] never fails (errors map to `ok=false`);
//! [`HealthService::try_probe_ollama`] returns a strict `Result`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::embedding_config::EmbeddingConfig;
use crate::error_handler::{
    EmbeddingError, HealthError, Result, make_snippet, validate_http_endpoint,
};

/// A serializable health snapshot for the embedding backend.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier the probe looked for.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    fn ok(cfg: &EmbeddingConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            endpoint: cfg.base_url().to_string(),
            model: cfg.model.clone(),
            ok: true,
            latency_ms,
            message: message.into(),
        }
    }

    fn fail(cfg: &EmbeddingConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            endpoint: cfg.base_url().to_string(),
            model: cfg.model.clone(),
            ok: false,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker reusing a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds, default 10).
    ///
    /// # Errors
    /// Returns [`EmbeddingError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        debug!(timeout_secs = timeout.as_secs(), "HealthService initialized");

        Ok(Self { client })
    }

    /// Checks the embedding backend.
    ///
    /// Resilient: any failure is converted to `HealthStatus { ok: false, .. }`.
    pub async fn check(&self, cfg: &EmbeddingConfig) -> HealthStatus {
        let start = Instant::now();
        match self.try_probe_ollama(cfg).await {
            Ok(status) => {
                info!(
                    endpoint = %status.endpoint,
                    model = %status.model,
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "embedding health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::fail(cfg, start.elapsed().as_millis(), err.to_string());
                warn!(
                    endpoint = %status.endpoint,
                    model = %status.model,
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "embedding health probe failed"
                );
                status
            }
        }
    }

    /// Strict Ollama probe. Returns an error on hard failures.
    ///
    /// - `GET {endpoint}/api/tags`, require 2xx
    /// - model present in `models[].name` (a `:latest` tag counts as a match)
    pub async fn try_probe_ollama(&self, cfg: &EmbeddingConfig) -> Result<HealthStatus> {
        if validate_http_endpoint("OLLAMA_URL", &cfg.endpoint).is_err() {
            return Err(HealthError::InvalidEndpoint(cfg.endpoint.clone()).into());
        }

        let url = format!("{}/api/tags", cfg.base_url());
        let start = Instant::now();
        debug!(endpoint = %cfg.endpoint, model = %cfg.model, "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(EmbeddingError::from)?;

        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %url,
                %status,
                %snippet,
                latency_ms = latency,
                "health GET /api/tags returned non-success status"
            );

            return Err(HealthError::HttpStatus {
                status,
                url,
                snippet,
            }
            .into());
        }

        match resp.json::<Tags>().await {
            Ok(Tags {
                models: Some(models),
            }) => {
                if models.iter().any(|m| model_matches(&m.name, &cfg.model)) {
                    Ok(HealthStatus::ok(
                        cfg,
                        latency,
                        "Ollama is healthy; embedding model is available",
                    ))
                } else {
                    Ok(HealthStatus::fail(
                        cfg,
                        latency,
                        "Ollama is up, but embedding model not found in /api/tags",
                    ))
                }
            }
            Ok(Tags { models: None }) => Ok(HealthStatus::ok(
                cfg,
                latency,
                "Ollama is healthy; tags response without `models` field",
            )),
            Err(e) => {
                warn!(
                    endpoint = %cfg.endpoint,
                    error = %e,
                    latency_ms = latency,
                    "failed to decode /api/tags; treating server as reachable"
                );
                Ok(HealthStatus::ok(
                    cfg,
                    latency,
                    format!("Ollama is reachable; failed to decode /api/tags: {e}"),
                ))
            }
        }
    }
}

// Expected minimal JSON: { "models": [ { "name": "<model>" }, ... ] }
#[derive(Deserialize)]
struct Tag {
    name: String,
}

#[derive(Deserialize)]
struct Tags {
    models: Option<Vec<Tag>>,
}

/// `all-minilm` matches `all-minilm:latest`.
fn model_matches(listed: &str, wanted: &str) -> bool {
    listed == wanted || (!wanted.contains(':') && listed == format!("{wanted}:latest"))
}

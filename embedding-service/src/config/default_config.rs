//! Embedding config loaded from environment variables.
//!
//! Semantic search is optional: when neither an endpoint nor a model is
//! configured, [`config_ollama_embedding`] returns `Ok(None)` and the caller
//! runs in keyword-only mode. Malformed values are still reported as errors.
//!
//! # Environment variables
//!
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint
//! - `EMBEDDING_MODEL`             = embedding model
//! - `EMBEDDING_TIMEOUT_SECS`      = optional request timeout (u64, default 60)

use crate::{
    config::embedding_config::EmbeddingConfig,
    error_handler::{ConfigError, Result, env_opt_u64, opt_env, validate_http_endpoint},
};

/// Default timeout for a single batch embedding call.
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 60;

/// Resolves the Ollama endpoint from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// Returns `Ok(None)` when neither is set.
fn ollama_endpoint() -> Result<Option<String>> {
    if let Some(url) = opt_env("OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(Some(url.trim().to_string()));
    }
    if let Some(port) = opt_env("OLLAMA_PORT") {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(Some(format!("http://localhost:{port}")));
    }
    Ok(None)
}

/// Constructs the embedding config from environment.
///
/// # Errors
/// - [`ConfigError::InvalidFormat`] if `OLLAMA_URL` has no http(s) scheme
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` or `EMBEDDING_TIMEOUT_SECS` is invalid
/// - [`ConfigError::MissingVar`] if only one of endpoint/model is configured
pub fn config_ollama_embedding() -> Result<Option<EmbeddingConfig>> {
    let endpoint = ollama_endpoint()?;
    let model = opt_env("EMBEDDING_MODEL");
    let timeout_secs =
        env_opt_u64("EMBEDDING_TIMEOUT_SECS")?.or(Some(DEFAULT_EMBEDDING_TIMEOUT_SECS));

    match (endpoint, model) {
        (None, None) => Ok(None),
        (Some(endpoint), Some(model)) => Ok(Some(EmbeddingConfig {
            model: model.trim().to_string(),
            endpoint,
            timeout_secs,
        })),
        (Some(_), None) => Err(ConfigError::MissingVar("EMBEDDING_MODEL").into()),
        (None, Some(_)) => Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into()),
    }
}

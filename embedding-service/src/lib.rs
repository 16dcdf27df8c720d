//! Embedding backend for semantic passage search.
//!
//! - [`config`]: env-driven [`EmbeddingConfig`] (optional: absent config means keyword-only mode)
//! - [`services::ollama_service`]: batch `/api/embed` client
//! - [`health_service`]: `/api/tags` probe
//! - [`EmbeddingService`]: client plus the one-time availability decision
//! - [`telemetry`]: tracing subscriber setup shared by the binary

pub mod config;
pub mod embedding_service;
pub mod error_handler;
pub mod health_service;
pub mod services;
pub mod telemetry;

pub use config::embedding_config::EmbeddingConfig;
pub use embedding_service::EmbeddingService;
pub use error_handler::{ConfigError, EmbeddingError, HealthError};
pub use health_service::HealthStatus;

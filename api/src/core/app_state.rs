use std::env;

use passage_store::PassageStore;

/// Listen address used when `API_ADDRESS` is unset.
pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:5000";

/// HTTP server settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. "0.0.0.0:5000".
    pub address: String,
}

impl ServerConfig {
    /// Reads `API_ADDRESS`, falling back to [`DEFAULT_API_ADDRESS`].
    pub fn from_env() -> Self {
        let address = env::var("API_ADDRESS")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_ADDRESS.into());
        Self { address }
    }
}

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Corpus cache and retriever; owns the current snapshot.
    pub store: PassageStore,
}

impl AppState {
    pub fn new(store: PassageStore) -> Self {
        Self { store }
    }
}

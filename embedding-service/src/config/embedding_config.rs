/// Configuration for the embedding model invocation.
///
/// # Fields
///
/// - `model`: The embedding model identifier (e.g., `"all-minilm"`, `"nomic-embed-text"`).
/// - `endpoint`: Base URL of the Ollama server (e.g., `"http://localhost:11434"`).
/// - `timeout_secs`: Optional request timeout in seconds for embedding calls.
///
/// # Examples
///
/// ```
/// use embedding_service::config::embedding_config::EmbeddingConfig;
///
/// let cfg = EmbeddingConfig {
///     model: "all-minilm".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.base_url(), "http://localhost:11434");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingConfig {
    /// Model identifier string.
    pub model: String,

    /// Ollama base URL.
    pub endpoint: String,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl EmbeddingConfig {
    /// Endpoint without surrounding whitespace or trailing slashes.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}

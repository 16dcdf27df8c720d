use serde::Deserialize;

/// Request payload for /ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question. Missing and `null` are treated alike.
    #[serde(default)]
    pub question: Option<String>,
}

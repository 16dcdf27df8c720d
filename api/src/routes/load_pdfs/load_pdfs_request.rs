use serde::Deserialize;

/// Request payload for /load_pdfs.
#[derive(Debug, Deserialize)]
pub struct LoadPdfsRequest {
    /// Folder on the server's filesystem to index.
    #[serde(default)]
    pub folder_path: Option<String>,
}

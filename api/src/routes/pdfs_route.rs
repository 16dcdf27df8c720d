use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct PdfsResponse {
    pub pdfs: Vec<String>,
}

/// Handler: GET /pdfs
///
/// Lists PDFs on disk in the default folder; does not load or index them.
pub async fn pdfs_route(State(state): State<Arc<AppState>>) -> Response {
    match state.store.pdf_files().await {
        Ok(pdfs) => (StatusCode::OK, Json(PdfsResponse { pdfs })).into_response(),
        Err(err) => {
            error!(error = %err, "pdfs_route: listing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PdfsResponse { pdfs: Vec::new() }),
            )
                .into_response()
        }
    }
}

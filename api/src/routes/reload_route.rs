use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{error, info};

use crate::{
    core::{app_state::AppState, http::response_envelope::FolderEnvelope},
    error_handler::AppError,
    routes::request_id,
};

/// Handler: POST /reload
///
/// Re-reads the default folder so new or removed PDFs are picked up. A folder
/// switched to with `/load_pdfs` is replaced by the default one.
pub async fn reload_route(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let request_id = request_id(&headers);

    match state.store.reload().await {
        Ok(snapshot) => {
            let pdfs = snapshot.filenames();
            info!(request_id = %request_id, count = pdfs.len(), "reload_route: reloaded");
            FolderEnvelope::loaded(format!("Reloaded {} PDF file(s).", pdfs.len()), pdfs)
                .into_response_with_status(StatusCode::OK)
        }
        Err(err) => {
            let err = AppError::from(err);
            error!(request_id = %request_id, error = %err, "reload_route: failed");
            FolderEnvelope::failure(err.client_message())
                .into_response_with_status(err.status_code())
        }
    }
}

//! POST /load_pdfs: switches the corpus to another folder.

use std::{path::Path, sync::Arc};

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{debug, error, info};

use crate::{
    core::{app_state::AppState, http::response_envelope::FolderEnvelope},
    error_handler::{AppError, AppResult},
    routes::{load_pdfs::load_pdfs_request::LoadPdfsRequest, request_id},
};

/// Handler: POST /load_pdfs
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/load_pdfs \
///   -H 'content-type: application/json' \
///   -d '{"folder_path":"/srv/handbooks"}'
/// ```
pub async fn load_pdfs_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<LoadPdfsRequest>, JsonRejection>,
) -> Response {
    let request_id = request_id(&headers);

    let folder = match payload {
        Ok(Json(LoadPdfsRequest {
            folder_path: Some(folder),
        })) => folder,
        Ok(_) => return reject(AppError::BadRequest("Please provide a folder_path.".into())),
        Err(rejection) => {
            debug!(request_id = %request_id, rejection = %rejection.body_text(), "load_pdfs_route: unreadable body");
            return reject(AppError::BadRequest("Please provide a folder_path.".into()));
        }
    };

    let folder = folder.trim();
    if let Err(err) = validate_folder(folder).await {
        debug!(request_id = %request_id, folder = %folder, error = %err, "load_pdfs_route: rejected");
        return reject(err);
    }

    match state.store.load_folder(Path::new(folder)).await {
        Ok(snapshot) if snapshot.is_empty() => {
            info!(request_id = %request_id, folder = %folder, "load_pdfs_route: no pdfs");
            FolderEnvelope::loaded(format!("No PDF files found in: {folder}"), Vec::new())
                .into_response_with_status(StatusCode::OK)
        }
        Ok(snapshot) => {
            let pdfs = snapshot.filenames();
            info!(request_id = %request_id, folder = %folder, count = pdfs.len(), "load_pdfs_route: loaded");
            FolderEnvelope::loaded(
                format!("Loaded {} PDF file(s) from: {folder}", pdfs.len()),
                pdfs,
            )
            .into_response_with_status(StatusCode::OK)
        }
        Err(err) => {
            let err = AppError::from(err);
            error!(request_id = %request_id, folder = %folder, error = %err, "load_pdfs_route: failed");
            reject(err)
        }
    }
}

/// Rejects empty, missing and non-directory paths before touching the cache.
async fn validate_folder(folder: &str) -> AppResult<()> {
    if folder.is_empty() {
        return Err(AppError::BadRequest("Folder path cannot be empty.".into()));
    }
    let path = Path::new(folder);
    if !tokio::fs::try_exists(path)
        .await
        .map_err(|e| AppError::Store(e.into()))?
    {
        return Err(AppError::BadRequest(format!("Folder does not exist: {folder}")));
    }
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| AppError::Store(e.into()))?;
    if !meta.is_dir() {
        return Err(AppError::BadRequest(format!("Path is not a directory: {folder}")));
    }
    Ok(())
}

fn reject(err: AppError) -> Response {
    FolderEnvelope::failure(err.client_message()).into_response_with_status(err.status_code())
}

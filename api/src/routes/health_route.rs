use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub extraction_support: bool,
    pub semantic_support: bool,
}

/// Handler: GET /health
pub async fn health_route(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        extraction_support: state.store.supports_extraction(),
        semantic_support: state.store.supports_semantic_search(),
    })
}

pub mod ask;
pub mod health_route;
pub mod load_pdfs;
pub mod pdfs_route;
pub mod reload_route;

use axum::http::HeaderMap;

/// Caller-supplied `X-Request-Id`, or `-` for log correlation.
pub(crate) fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}

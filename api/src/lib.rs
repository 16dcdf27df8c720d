//! HTTP surface of the PDF question-answering server.

use std::{any::Any, sync::Arc};

pub mod core;
mod error_handler;
mod routes;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

pub use crate::core::app_state::{AppState, ServerConfig};
pub use crate::error_handler::{AppError, AppResult};

use crate::routes::{
    ask::ask_route::ask_route, health_route::health_route,
    load_pdfs::load_pdfs_route::load_pdfs_route, pdfs_route::pdfs_route,
    reload_route::reload_route,
};

/// All routes with CORS (any origin), request tracing and panic recovery.
pub fn router(state: Arc<AppState>) -> Router {
    with_layers(
        Router::new()
            .route("/health", get(health_route))
            .route("/ask", post(ask_route))
            .route("/pdfs", get(pdfs_route))
            .route("/reload", post(reload_route))
            .route("/load_pdfs", post(load_pdfs_route)),
    )
    .with_state(state)
}

fn with_layers(routes: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    routes
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any),
        )
}

/// A panicking handler becomes a 500 with the failure envelope.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!(panic = %detail, "request handler panicked");
    AppError::Internal("request handler panicked".into()).into_response()
}

/// Binds `config.address` and serves until Ctrl+C.
///
/// # Errors
/// `AppError::Bind` if the address cannot be bound, `AppError::Server` if the
/// server stops with an I/O error.
pub async fn start(config: ServerConfig, state: AppState) -> AppResult<()> {
    let app = router(Arc::new(state));

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&config.address)
        .await
        .map_err(|source| AppError::Bind {
            address: config.address.clone(),
            source,
        })?;
    info!(address = %config.address, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        // Without a signal handler, never resolve instead of exiting at once.
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use passage_store::{NoopEmbedder, PassageStore, PdfTextExtractor, StoreConfig};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn state(folder: &Path) -> Arc<AppState> {
        let store = PassageStore::new(
            StoreConfig::new_default(folder),
            Arc::new(PdfTextExtractor::new()),
            Arc::new(NoopEmbedder),
        );
        Arc::new(AppState::new(store))
    }

    async fn call(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, Value) {
        let res = router(Arc::clone(state))
            .oneshot(req)
            .await
            .expect("router response");
        let status = res.status();
        let bytes = res
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    async fn exploding_handler() -> &'static str {
        panic!("handler blew up")
    }

    #[tokio::test]
    async fn panicking_handler_becomes_a_500_envelope() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = with_layers(Router::new().route("/boom", axum::routing::get(exploding_handler)))
            .with_state(state(dir.path()));

        let res = app.oneshot(get("/boom")).await.expect("router response");
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = res
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("INTERNAL_ERROR"));
        assert_eq!(
            body["message"],
            json!("An error occurred: internal error: request handler panicked")
        );
    }

    #[tokio::test]
    async fn health_reports_capabilities() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (status, body) = call(&state(dir.path()), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "healthy", "extraction_support": true, "semantic_support": false})
        );
    }

    #[tokio::test]
    async fn ask_requires_a_question() {
        let dir = tempfile::tempdir().expect("tempdir");
        let st = state(dir.path());

        let (status, body) = call(&st, post_json("/ask", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["answer"], json!("Please provide a question."));
        assert_eq!(body["sources"], json!([]));
        assert_eq!(body["top_confidence"], json!(0.0));

        let (status, body) = call(&st, post_empty("/ask")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["answer"], json!("Please provide a question."));

        let (status, body) = call(&st, post_json("/ask", json!({"question": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["answer"], json!("Question cannot be empty."));
    }

    #[tokio::test]
    async fn ask_with_empty_folder_reports_no_corpus() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (status, body) = call(
            &state(dir.path()),
            post_json("/ask", json!({"question": "What is covered?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(
            body["answer"],
            json!("No PDF files are currently loaded. Please load PDFs from a folder first.")
        );
        assert_eq!(body["sources"], json!([]));
    }

    #[tokio::test]
    async fn load_pdfs_rejects_a_file_path_and_keeps_the_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "plain text").expect("write");
        let st = state(dir.path());

        let folder = file.to_string_lossy().to_string();
        let (status, body) =
            call(&st, post_json("/load_pdfs", json!({"folder_path": folder}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!(format!("Path is not a directory: {folder}")));
        assert_eq!(body["pdfs"], json!([]));
        assert!(st.store.cache().current().await.is_none());
    }

    #[tokio::test]
    async fn load_pdfs_validates_folder_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let st = state(dir.path());

        let (status, body) = call(&st, post_json("/load_pdfs", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("Please provide a folder_path."));

        let (status, body) =
            call(&st, post_json("/load_pdfs", json!({"folder_path": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("Folder path cannot be empty."));

        let missing = dir.path().join("missing").to_string_lossy().to_string();
        let (status, body) =
            call(&st, post_json("/load_pdfs", json!({"folder_path": missing}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!(format!("Folder does not exist: {missing}")));
    }

    #[tokio::test]
    async fn load_pdfs_on_an_empty_folder_succeeds() {
        let default = tempfile::tempdir().expect("tempdir");
        let other = tempfile::tempdir().expect("tempdir");
        let st = state(default.path());

        let folder = other.path().to_string_lossy().to_string();
        let (status, body) =
            call(&st, post_json("/load_pdfs", json!({"folder_path": folder}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["message"], json!(format!("No PDF files found in: {folder}")));
        assert_eq!(body["pdfs"], json!([]));
    }

    #[tokio::test]
    async fn unreadable_pdf_is_listed_but_never_matches() {
        let default = tempfile::tempdir().expect("tempdir");
        let other = tempfile::tempdir().expect("tempdir");
        std::fs::write(other.path().join("broken.pdf"), b"not really a pdf").expect("write");
        let st = state(default.path());

        let folder = other.path().to_string_lossy().to_string();
        let (status, body) =
            call(&st, post_json("/load_pdfs", json!({"folder_path": folder}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!(format!("Loaded 1 PDF file(s) from: {folder}")));
        assert_eq!(body["pdfs"], json!(["broken.pdf"]));

        // Listing stays on the default folder.
        let (status, body) = call(&st, get("/pdfs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"pdfs": []}));

        let (status, body) =
            call(&st, post_json("/ask", json!({"question": "refund policy"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(
            body["answer"],
            json!("No matching content found for your question. Try rephrasing or asking a different question.")
        );

        // Reload goes back to the (empty) default folder.
        let (status, body) = call(&st, post_empty("/reload")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Reloaded 0 PDF file(s)."));
        assert_eq!(body["pdfs"], json!([]));
    }

    #[tokio::test]
    async fn reload_of_missing_default_folder_creates_it() {
        let root = tempfile::tempdir().expect("tempdir");
        let folder = root.path().join("pdfs");
        let (status, body) = call(&state(&folder), post_empty("/reload")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "message": "Reloaded 0 PDF file(s).", "pdfs": []})
        );
        assert!(folder.is_dir());
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use passage_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- IO / server ---
    #[error("failed to bind listener on {address}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    /// Client input problem; the message is returned verbatim.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Fault outside the typed error paths (a panicking handler).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::InvalidFolder { .. } | StoreError::EmptyQuestion) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Store(_)
            | AppError::Bind { .. }
            | AppError::Server(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Bind { .. } => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Store(StoreError::InvalidFolder { .. }) => "INVALID_FOLDER",
            AppError::Store(StoreError::EmptyQuestion) => "EMPTY_QUESTION",
            AppError::Store(_) | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message placed in the response envelope.
    pub fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Store(StoreError::EmptyQuestion) => "Question cannot be empty.".into(),
            AppError::Store(err @ StoreError::InvalidFolder { .. }) => err.to_string(),
            other => format!("An error occurred: {other}"),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    message: String,
}

/// Generic failure envelope for errors that escape a route family's own
/// envelope.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            success: false,
            error: self.error_code(),
            message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn invalid_folder_is_a_client_error() {
        let err = AppError::from(StoreError::InvalidFolder {
            path: PathBuf::from("/srv/missing"),
            reason: "Folder does not exist",
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "Folder does not exist: /srv/missing");
    }

    #[test]
    fn io_failures_are_server_errors() {
        let err = AppError::from(StoreError::Io(std::io::Error::other("disk on fire")));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(err.client_message(), "An error occurred: io error: disk on fire");
    }

    #[tokio::test]
    async fn into_response_uses_the_failure_envelope() {
        let res = AppError::Internal("request handler panicked".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = res.into_body().collect().await.expect("body").to_bytes();
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "INTERNAL_ERROR",
                "message": "An error occurred: internal error: request handler panicked"
            })
        );

        let res = AppError::BadRequest("Please provide a question.".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

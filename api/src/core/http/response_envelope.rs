use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use passage_store::{Answer, Source};
use serde::Serialize;

/// Response body of `POST /ask`, for answers and failures alike.
#[derive(Debug, Serialize)]
pub struct AskEnvelope {
    pub success: bool,
    pub answer: String,
    pub sources: Vec<Source>,
    pub top_confidence: f32,
}

impl AskEnvelope {
    pub fn answered(answer: Answer) -> Self {
        Self {
            success: true,
            answer: answer.answer,
            sources: answer.sources,
            top_confidence: answer.top_score,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            answer: message.into(),
            sources: Vec::new(),
            top_confidence: 0.0,
        }
    }

    /// Convert to axum Response.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Response body of `POST /reload` and `POST /load_pdfs`.
#[derive(Debug, Serialize)]
pub struct FolderEnvelope {
    pub success: bool,
    pub message: String,
    pub pdfs: Vec<String>,
}

impl FolderEnvelope {
    pub fn loaded(message: impl Into<String>, pdfs: Vec<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            pdfs,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            pdfs: Vec::new(),
        }
    }

    /// Convert to axum Response.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

//! POST /ask: answers a question from the loaded PDFs.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{debug, error};

use crate::{
    core::{app_state::AppState, http::response_envelope::AskEnvelope},
    error_handler::AppError,
    routes::{ask::ask_request::AskRequest, request_id},
};

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is the refund policy?"}'
/// ```
pub async fn ask_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Response {
    let request_id = request_id(&headers);

    let question = match payload {
        Ok(Json(AskRequest {
            question: Some(question),
        })) => question,
        Ok(_) => return reject(AppError::BadRequest("Please provide a question.".into())),
        Err(rejection) => {
            debug!(request_id = %request_id, rejection = %rejection.body_text(), "ask_route: unreadable body");
            return reject(AppError::BadRequest("Please provide a question.".into()));
        }
    };

    let question = question.trim();
    if question.is_empty() {
        return reject(AppError::BadRequest("Question cannot be empty.".into()));
    }

    debug!(request_id = %request_id, question = %question, "ask_route: start");

    match state.store.ask(question).await {
        Ok(answer) => {
            debug!(
                request_id = %request_id,
                kind = ?answer.kind,
                sources = answer.sources.len(),
                "ask_route: success"
            );
            AskEnvelope::answered(answer).into_response_with_status(StatusCode::OK)
        }
        Err(err) => {
            let err = AppError::from(err);
            error!(request_id = %request_id, error = %err, "ask_route: failed");
            reject(err)
        }
    }
}

fn reject(err: AppError) -> Response {
    AskEnvelope::failure(err.client_message()).into_response_with_status(err.status_code())
}

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use tracing::debug;

use super::dto::{ChatBody, ChatReply};
use super::error::ApiError;
use super::AppState;
use crate::tutor::{ChatError, ChatRequest, StatusResult};

/// `POST /api/chat`
pub(crate) async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::MalformedRequest(e.body_text()))?;
    let message = body
        .message
        .ok_or_else(|| ApiError::MalformedRequest("missing `message`".into()))?;

    let req = ChatRequest {
        message,
        history: body.history.unwrap_or_default(),
    };
    debug!(history = req.history.len(), "chat request");

    let resp = state.chat.handle(req).await.map_err(|e| match e {
        ChatError::MalformedRequest => ApiError::MalformedRequest(e.to_string()),
    })?;

    Ok(Json(ChatReply {
        response: resp.response_text,
        is_demo: resp.is_fallback,
    }))
}

/// `GET /api/provider-status`, also served as `/api/gemini-status`.
pub(crate) async fn provider_status(State(state): State<AppState>) -> Json<StatusResult> {
    Json(state.gemini_status.probe().await)
}

/// `GET /api/health`
pub(crate) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

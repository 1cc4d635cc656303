use std::convert::Infallible;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio_stream::StreamExt;
use tracing::{info, warn};

use super::dto::GroqChatBody;
use super::error::ApiError;
use super::AppState;
use crate::provider::groq::GroqConfig;
use crate::tutor::StatusResult;

/// `POST /api/groq/chat`
pub(crate) async fn chat(
    State(state): State<AppState>,
    body: Result<Json<GroqChatBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    if !state.groq_credential.is_configured() {
        return Err(ApiError::GroqNotConfigured);
    }
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if body.messages.is_empty() {
        return Err(ApiError::BadRequest("`messages` must not be empty".into()));
    }

    let defaults = GroqConfig::default();
    let config = GroqConfig {
        model: body.model.unwrap_or(defaults.model),
        temperature: body.temperature.unwrap_or(defaults.temperature),
        max_tokens: body.max_tokens.unwrap_or(defaults.max_tokens),
        top_p: body.top_p.unwrap_or(defaults.top_p),
    };
    info!(model = %config.model, messages = body.messages.len(), stream = body.stream, "groq chat");

    if !body.stream {
        let reply = state.groq.chat(&body.messages, &config).await?;
        return Ok(Json(reply).into_response());
    }

    let deltas = state.groq.stream_chat(&body.messages, &config).await?;
    let events = deltas
        .map(|item| {
            Ok::<_, Infallible>(match item {
                // Event::data rejects carriage returns.
                Ok(text) => Event::default().data(text.replace('\r', "")),
                Err(e) => {
                    warn!(error = %e, "groq stream interrupted");
                    Event::default()
                        .event("error")
                        .data(e.to_string().replace('\r', ""))
                }
            })
        })
        .chain(tokio_stream::once(Ok(Event::default().event("done").data("[DONE]"))));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()).into_response())
}

/// `GET /api/groq-status`
pub(crate) async fn status(State(state): State<AppState>) -> Json<StatusResult> {
    Json(state.groq_status.probe().await)
}

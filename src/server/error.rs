use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::dto::ErrorBody;
use crate::provider::ProviderError;

/// Errors the HTTP layer reports to callers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The chat body could not be understood. Reported as 500 with the demo
    /// flag so the chat widget shows its generic retry message.
    #[error("malformed chat request: {0}")]
    MalformedRequest(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Groq API key is required")]
    GroqNotConfigured,

    #[error("Groq API Error: {0}")]
    Upstream(#[from] ProviderError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MalformedRequest(reason) => {
                error!(%reason, "error in chat API");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Failed to process your message. Please try again.".to_string(),
                        is_demo: true,
                    },
                )
            }
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg.clone(),
                    is_demo: false,
                },
            ),
            ApiError::GroqNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    error: self.to_string(),
                    is_demo: false,
                },
            ),
            ApiError::Upstream(e) => {
                error!(error = %e, "Groq API error");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error: self.to_string(),
                        is_demo: false,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

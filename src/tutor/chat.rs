use std::sync::Arc;

use tracing::{debug, error, info};

use super::canned::{self, Picker, SystemPicker};
use super::prompt::{build_prompt, HistoryEntry};
use crate::config::ProviderConfig;
use crate::provider::{DynProvider, GenerationParams, ProviderError};

#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub message: String,
    /// Oldest first.
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    /// Never empty.
    pub response_text: String,
    /// Set when the text is canned rather than generated.
    pub is_fallback: bool,
}

impl ChatResponse {
    fn fallback(text: &str) -> Self {
        Self {
            response_text: text.to_string(),
            is_fallback: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message is required")]
    MalformedRequest,
}

/// Tutor chat: relays to the upstream model, or answers from canned text
/// when no credential is configured or the upstream call fails.
#[derive(Clone)]
pub struct ChatProxy {
    credential: ProviderConfig,
    provider: DynProvider,
    picker: Arc<dyn Picker>,
}

impl ChatProxy {
    pub fn new(credential: ProviderConfig, provider: DynProvider) -> Self {
        Self {
            credential,
            provider,
            picker: Arc::new(SystemPicker::new()),
        }
    }

    pub fn with_picker(mut self, picker: Arc<dyn Picker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn is_demo(&self) -> bool {
        !self.credential.is_configured()
    }

    /// Only a blank message is an error; every upstream problem degrades
    /// to fallback text.
    pub async fn handle(&self, req: ChatRequest) -> Result<ChatResponse, ChatError> {
        if req.message.trim().is_empty() {
            return Err(ChatError::MalformedRequest);
        }

        if self.is_demo() {
            debug!("no credential configured; answering in demo mode");
            return Ok(ChatResponse::fallback(canned::demo_reply(
                &req.message,
                self.picker.as_ref(),
            )));
        }

        let prompt = build_prompt(&req.history, &req.message);
        let provider = self.provider.name();

        match self.provider.generate(prompt, GenerationParams::tutor()).await {
            Ok(Some(text)) => {
                info!(provider, chars = text.len(), "generated tutor reply");
                Ok(ChatResponse {
                    response_text: text,
                    is_fallback: false,
                })
            }
            Ok(None) => {
                info!(provider, "upstream returned no text");
                Ok(ChatResponse {
                    response_text: canned::EMPTY_REPLY.to_string(),
                    is_fallback: false,
                })
            }
            Err(ProviderError::Status { status, body }) => {
                error!(provider, %status, %body, "upstream API error");
                Ok(ChatResponse::fallback(canned::TECHNICAL_DIFFICULTY_REPLY))
            }
            Err(e) => {
                error!(provider, error = %e, "upstream call failed");
                Ok(ChatResponse::fallback(canned::TECHNICAL_DIFFICULTY_REPLY))
            }
        }
    }
}

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

/// Sampling parameters forwarded to the upstream model.
///
/// Every field is optional; unset fields are left to the provider's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationParams {
    /// Settings used for tutoring replies.
    pub fn tutor() -> Self {
        Self {
            temperature: Some(0.7),
            top_p: Some(0.8),
            top_k: Some(40),
            max_output_tokens: Some(1024),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Failure talking to an upstream provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a non-success HTTP status.
    #[error("upstream returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The request never completed (connect error, timeout, reset).
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered 2xx but the body did not parse.
    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}

pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<String>, ProviderError>> + Send + 'a>>;

pub type ProbeFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ProviderError>> + Send + 'a>>;

/// Provider interface.
///
/// A single-shot, non-streaming text generation call. `Ok(None)` means the
/// upstream call succeeded but carried no text.
pub trait TextGenerationProvider: Sync {
    fn name(&self) -> &'static str;

    fn generate(&self, prompt: String, params: GenerationParams) -> GenerateFuture<'_>;

    /// Cheapest call that proves the credential and endpoint work.
    fn probe(&self) -> ProbeFuture<'_> {
        Box::pin(async move {
            self.generate("Hello".to_string(), GenerationParams::default())
                .await
                .map(|_| ())
        })
    }
}

#[cfg(feature = "google")]
pub mod google;
pub mod groq;
mod sse;
pub mod stub;
mod types;

pub use types::{
    GenerateFuture, GenerationParams, ProbeFuture, ProviderError, TextGenerationProvider,
};

/// Shared handle to whichever provider the configuration selected.
pub type DynProvider = std::sync::Arc<dyn TextGenerationProvider + Send + Sync>;

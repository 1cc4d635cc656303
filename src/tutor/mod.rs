//! Tutor chat and provider status, independent of the HTTP layer.

pub mod canned;
mod chat;
mod prompt;
mod status;

pub use chat::{ChatError, ChatProxy, ChatRequest, ChatResponse};
pub use prompt::{build_prompt, HistoryEntry, Role, HISTORY_WINDOW};
pub use status::{Status, StatusProbe, StatusResult};

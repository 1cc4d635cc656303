//! Wire shapes of the JSON API.

use serde::{Deserialize, Serialize};

use crate::provider::groq::GroqMessage;
use crate::tutor::HistoryEntry;

fn is_false(b: &bool) -> bool {
    !*b
}

/// `POST /api/chat` body. `message` is optional here so a missing field
/// reaches the handler instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<HistoryEntry>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
    #[serde(rename = "isDemo", default, skip_serializing_if = "is_false")]
    pub is_demo: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(rename = "isDemo", default, skip_serializing_if = "is_false")]
    pub is_demo: bool,
}

/// `POST /api/groq/chat` body; unset knobs take the playground defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroqChatBody {
    #[serde(default)]
    pub messages: Vec<GroqMessage>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    #[serde(default)]
    pub stream: bool,
}

use serde::{Deserialize, Serialize};

/// Only this many trailing history entries reach the model.
pub const HISTORY_WINDOW: usize = 5;

const PREAMBLE: &str = "You are an AI tutor helping students learn. Format your responses using single bullet points organized by categories. Be encouraging, clear, and educational.

IMPORTANT FORMATTING RULES:
- Use single bullet points (•) for each piece of information
- Organize information into clear categories with headers
- Keep each bullet point concise and focused
- Use categories like: Key Concepts, Examples, Practice Tips, Remember, etc.";

const CLOSING: &str =
    "Please provide a helpful, educational response formatted with single bullet points organized by categories:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn speaker(self) -> &'static str {
        match self {
            Role::User => "Student",
            Role::Assistant => "Tutor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Full upstream prompt: persona and formatting rules, the recent
/// conversation, then the student's new message.
pub fn build_prompt(history: &[HistoryEntry], message: &str) -> String {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let conversation = history[start..]
        .iter()
        .map(|e| format!("{}: {}", e.role.speaker(), e.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{PREAMBLE}\n\nPrevious conversation:\n{conversation}\n\nStudent: {message}\n\n{CLOSING}")
}

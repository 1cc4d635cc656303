//! Demo-mode replies used when no provider credential is configured.

use ring::rand::{SecureRandom, SystemRandom};

/// Pool the default demo reply is drawn from, uniformly.
pub const DEMO_TEMPLATES: [&str; 8] = [
    "I'm currently in demo mode! To enable full AI functionality, please configure your Gemini API key in the environment variables. For now, I can help you explore the platform features.",
    "Hello! I'm your AI tutor in demo mode. While I can't access the full AI capabilities without a proper API key, I'm here to show you how the chat interface works!",
    "Great question! In a fully configured environment, I would use Google's Gemini AI to provide detailed, personalized responses. Right now, I'm running in demo mode.",
    "I'd love to help you learn! This is a demonstration of the chat interface. With a proper Gemini API key configured, I could provide comprehensive tutoring across all subjects.",
    "That's an interesting topic! In production mode with the Gemini API, I could give you detailed explanations, examples, and even quiz you on the material.",
    "I understand you're curious about that! In demo mode, I can show you how our conversation flows. With full AI enabled, I'd provide detailed, subject-specific guidance.",
    "Excellent question! When properly configured with the Gemini API, I can offer personalized learning experiences, practice problems, and detailed explanations across all academic subjects.",
    "I appreciate your engagement! This demo showcases our chat interface. With the full AI system, I'd adapt my teaching style to your learning preferences and provide comprehensive support.",
];

pub const MATH_REPLY: &str = "I'd love to help with math! In demo mode, I can show you how I'd structure a response. With full AI enabled, I could solve equations, explain concepts step-by-step, and create practice problems tailored to your level.";

pub const SCIENCE_REPLY: &str = "Science is fascinating! In production mode, I could explain complex scientific concepts, provide real-world examples, and help you understand everything from basic chemistry to advanced physics.";

pub const HISTORY_REPLY: &str = "History is full of amazing stories! With the full AI system, I could provide detailed historical context, analyze events, and help you understand cause-and-effect relationships throughout time.";

/// Upstream answered but produced no text.
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't generate a response.";

/// Upstream failed (bad status, network, unparsable body).
pub const TECHNICAL_DIFFICULTY_REPLY: &str = "I'm experiencing some technical difficulties connecting to the AI service. This might be due to an invalid API key or network issues. In a production environment, I would provide comprehensive tutoring assistance!";

/// Keyword overrides, checked top to bottom against the lowercased message.
const KEYWORD_RULES: [(&str, &str); 3] = [
    ("math", MATH_REPLY),
    ("science", SCIENCE_REPLY),
    ("history", HISTORY_REPLY),
];

/// Source of the index used to pick a demo template.
pub trait Picker: Send + Sync {
    /// Return a value in `0..n`. `n` is never zero.
    fn pick(&self, n: usize) -> usize;
}

/// Picker backed by the OS random source.
pub struct SystemPicker {
    rng: SystemRandom,
}

impl SystemPicker {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Picker for SystemPicker {
    fn pick(&self, n: usize) -> usize {
        let mut buf = [0u8; 8];
        // SystemRandom only fails when the OS source is unavailable; the
        // first template is an acceptable answer then.
        if self.rng.fill(&mut buf).is_err() {
            return 0;
        }
        // Modulo bias over 2^64 is negligible for a handful of entries.
        (u64::from_le_bytes(buf) % n as u64) as usize
    }
}

/// Demo reply for `message`: the first matching keyword rule, or a random template.
pub fn demo_reply(message: &str, picker: &dyn Picker) -> &'static str {
    let lower = message.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(keyword, _)| lower.contains(*keyword))
        .map(|(_, reply)| *reply)
        .unwrap_or_else(|| {
            let n = DEMO_TEMPLATES.len();
            DEMO_TEMPLATES[picker.pick(n) % n]
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(usize);

    impl Picker for Fixed {
        fn pick(&self, _n: usize) -> usize {
            self.0
        }
    }

    #[test]
    fn keyword_priority_is_math_science_history() {
        let p = Fixed(0);
        assert_eq!(demo_reply("science and math", &p), MATH_REPLY);
        assert_eq!(demo_reply("History of SCIENCE", &p), SCIENCE_REPLY);
        assert_eq!(demo_reply("tell me some history", &p), HISTORY_REPLY);
        assert_eq!(demo_reply("I love MATHEMATICS", &p), MATH_REPLY);
    }

    #[test]
    fn no_keyword_uses_picked_template() {
        assert_eq!(demo_reply("hello there", &Fixed(5)), DEMO_TEMPLATES[5]);
        assert_eq!(demo_reply("", &Fixed(7)), DEMO_TEMPLATES[7]);
    }

    #[test]
    fn system_picker_stays_in_range_and_varies() {
        let p = SystemPicker::new();
        let mut seen = [false; DEMO_TEMPLATES.len()];
        for _ in 0..500 {
            let i = p.pick(DEMO_TEMPLATES.len());
            assert!(i < DEMO_TEMPLATES.len());
            seen[i] = true;
        }
        assert!(seen.iter().filter(|s| **s).count() > 1);
    }

    #[test]
    fn every_reply_is_non_empty() {
        assert!(DEMO_TEMPLATES.iter().all(|t| !t.is_empty()));
        assert!(!EMPTY_REPLY.is_empty() && !TECHNICAL_DIFFICULTY_REPLY.is_empty());
    }
}

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::Path;
use std::time::Duration;

pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";
pub const GROQ_KEY_VAR: &str = "GROQ_API_KEY";

pub const GEMINI_KEY_PLACEHOLDER: &str = "your_gemini_api_key_here";
pub const GROQ_KEY_PLACEHOLDER: &str = "your_groq_api_key_here";

pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 3000));
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Listen address for `serve` (default 127.0.0.1:3000).
    pub bind: Option<SocketAddr>,

    /// Upper bound on any single upstream call, in seconds.
    pub timeout_secs: Option<u64>,

    /// Browser origins allowed by CORS; unset or empty allows any.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default)]
    pub gemini: GeminiSection,

    #[serde(default)]
    pub groq: GroqSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeminiSection {
    /// Backend for the tutor chat: "google" (default) or "stub".
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GroqSection {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
}

impl Config {
    /// Load config if the file exists, otherwise return Ok(None).
    pub fn load_optional(path: impl AsRef<Path>) -> anyhow::Result<Option<Self>> {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::Error::new(e))
                    .with_context(|| format!("failed to read config: {}", path.display()))
            }
        };

        let s = String::from_utf8(bytes).context("config is not valid UTF-8")?;
        let cfg: Config = toml::from_str(&s)
            .with_context(|| format!("failed to parse TOML: {}", path.display()))?;
        Ok(Some(cfg))
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind.unwrap_or(DEFAULT_BIND)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1))
    }

    /// Gemini credential; the environment wins over the file.
    pub fn gemini_credential(&self) -> ProviderConfig {
        ProviderConfig::new(
            std::env::var(GEMINI_KEY_VAR)
                .ok()
                .or_else(|| self.gemini.api_key.clone()),
            GEMINI_KEY_PLACEHOLDER,
        )
    }

    /// Groq credential; the environment wins over the file.
    pub fn groq_credential(&self) -> ProviderConfig {
        ProviderConfig::new(
            std::env::var(GROQ_KEY_VAR)
                .ok()
                .or_else(|| self.groq.api_key.clone()),
            GROQ_KEY_PLACEHOLDER,
        )
    }
}

/// Process-wide provider credential, resolved once and only ever read.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    credential: Option<String>,
}

impl ProviderConfig {
    /// Blank values and the provider's `placeholder` sentinel count as absent.
    pub fn new(credential: Option<String>, placeholder: &str) -> Self {
        let credential = credential
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && c != placeholder);
        Self { credential }
    }

    pub fn absent() -> Self {
        Self { credential: None }
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.credential.is_some()
    }
}

// Never print the key itself.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("configured", &self.is_configured())
            .finish()
    }
}

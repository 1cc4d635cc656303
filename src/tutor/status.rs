use serde::Serialize;
use tracing::{error, warn};

use crate::config::ProviderConfig;
use crate::provider::{DynProvider, ProviderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Connected,
    Disconnected,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResult {
    pub status: Status,
    pub message: String,
    pub details: String,
}

impl StatusResult {
    fn new(status: Status, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: details.into(),
        }
    }
}

/// Reachability check for one upstream provider.
#[derive(Clone)]
pub struct StatusProbe {
    /// Human name, e.g. "Gemini".
    label: &'static str,
    /// Environment variable the operator sets to configure the key.
    key_var: &'static str,
    credential: ProviderConfig,
    provider: DynProvider,
}

impl StatusProbe {
    pub fn new(
        label: &'static str,
        key_var: &'static str,
        credential: ProviderConfig,
        provider: DynProvider,
    ) -> Self {
        Self {
            label,
            key_var,
            credential,
            provider,
        }
    }

    /// One best-effort upstream call; never fails.
    pub async fn probe(&self) -> StatusResult {
        if !self.credential.is_configured() {
            return StatusResult::new(
                Status::Disconnected,
                format!("{} API key not configured. Running in demo mode.", self.label),
                format!("Add {} to enable full AI features", self.key_var),
            );
        }

        match self.provider.probe().await {
            Ok(()) => StatusResult::new(
                Status::Connected,
                format!("{} AI", self.label),
                "Connected and ready",
            ),
            Err(ProviderError::Status { status, body }) => {
                error!(provider = self.label, %status, %body, "status check rejected");
                StatusResult::new(Status::Error, "Connection failed", "Check API key validity")
            }
            Err(ProviderError::Decode(reason)) => {
                warn!(provider = self.label, %reason, "status check got an unexpected reply");
                StatusResult::new(Status::Error, "Connection failed", "Unexpected response format")
            }
            Err(ProviderError::Transport(e)) => {
                error!(provider = self.label, error = %e, "status check failed");
                StatusResult::new(
                    Status::Error,
                    "Connection failed",
                    "Network or configuration error",
                )
            }
        }
    }
}

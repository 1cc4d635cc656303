use crate::cli::StatusTarget;
use crate::config::{self, Config, ProviderConfig};
use crate::provider::{self, DynProvider};
use crate::server::{self, AppState};
use crate::tutor::{ChatProxy, ChatRequest, StatusProbe};
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;

pub fn build_http(cfg: &Config) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(cfg.timeout())
        .build()
        .context("failed to build HTTP client")
}

/// Tutor backend plus the credential that gates it.
///
/// The stub needs no key, so it always counts as configured.
pub fn build_provider(
    http: &reqwest::Client,
    cfg: &Config,
) -> anyhow::Result<(ProviderConfig, DynProvider)> {
    let name = cfg.gemini.provider.as_deref().unwrap_or("google");
    match name {
        "google" => {
            #[cfg(feature = "google")]
            {
                let credential = cfg.gemini_credential();
                let p = provider::google::GoogleProvider::with_base(
                    http.clone(),
                    credential.credential().unwrap_or_default().to_string(),
                    cfg.gemini
                        .model
                        .clone()
                        .unwrap_or_else(|| provider::google::DEFAULT_MODEL.to_string()),
                    cfg.gemini
                        .api_base
                        .as_deref()
                        .unwrap_or(provider::google::DEFAULT_API_BASE),
                )?;
                Ok((credential, Arc::new(p)))
            }
            #[cfg(not(feature = "google"))]
            {
                let _ = http;
                anyhow::bail!("google provider is not enabled in this build")
            }
        }
        "stub" => Ok((
            ProviderConfig::new(Some("stub".to_string()), config::GEMINI_KEY_PLACEHOLDER),
            Arc::new(provider::stub::StubProvider::new()),
        )),
        other => anyhow::bail!("unknown provider: {other}"),
    }
}

pub fn build_groq(
    http: &reqwest::Client,
    cfg: &Config,
) -> anyhow::Result<(ProviderConfig, Arc<provider::groq::GroqProvider>)> {
    let credential = cfg.groq_credential();
    let p = provider::groq::GroqProvider::with_base(
        http.clone(),
        credential.credential().unwrap_or_default().to_string(),
        cfg.groq
            .model
            .clone()
            .unwrap_or_else(|| provider::groq::DEFAULT_MODEL.to_string()),
        cfg.groq
            .api_base
            .as_deref()
            .unwrap_or(provider::groq::DEFAULT_API_BASE),
    )?;
    Ok((credential, Arc::new(p)))
}

pub fn build_state(http: &reqwest::Client, cfg: &Config) -> anyhow::Result<AppState> {
    let (gemini_credential, tutor) = build_provider(http, cfg)?;
    let (groq_credential, groq) = build_groq(http, cfg)?;

    if !gemini_credential.is_configured() {
        tracing::warn!(
            "{} not set; tutor chat runs in demo mode",
            config::GEMINI_KEY_VAR
        );
    }

    Ok(AppState {
        chat: ChatProxy::new(gemini_credential.clone(), tutor.clone()),
        gemini_status: StatusProbe::new("Gemini", config::GEMINI_KEY_VAR, gemini_credential, tutor),
        groq: groq.clone(),
        groq_status: StatusProbe::new("Groq", config::GROQ_KEY_VAR, groq_credential.clone(), groq),
        groq_credential,
    })
}

pub async fn cmd_serve(state: AppState, addr: SocketAddr, cfg: &Config) -> anyhow::Result<()> {
    let server = server::start(state, addr, &cfg.cors_origins)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    server.handle.await.context("server task panicked")?;
    Ok(())
}

pub async fn cmd_status(state: &AppState, target: StatusTarget) -> anyhow::Result<()> {
    let result = match target {
        StatusTarget::Gemini => state.gemini_status.probe().await,
        StatusTarget::Groq => state.groq_status.probe().await,
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn cmd_ask(state: &AppState, message: String) -> anyhow::Result<()> {
    let resp = state
        .chat
        .handle(ChatRequest {
            message,
            history: Vec::new(),
        })
        .await?;

    println!("{}", resp.response_text);
    if resp.is_fallback {
        println!("(demo mode)");
    }
    Ok(())
}

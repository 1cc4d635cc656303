//! HTTP surface.
//!
//! - `POST /api/chat`            — tutor chat (demo replies without a key)
//! - `GET  /api/provider-status` — Gemini reachability (alias `/api/gemini-status`)
//! - `POST /api/groq/chat`       — Groq chat completions, optionally streamed as SSE
//! - `GET  /api/groq-status`     — Groq reachability
//! - `GET  /api/health`          — liveness

mod dto;
mod error;
mod groq;
mod handlers;

pub use dto::{ChatReply, ErrorBody};
pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};

use crate::config::ProviderConfig;
use crate::provider::groq::GroqProvider;
use crate::tutor::{ChatProxy, StatusProbe};

/// Shared state injected into axum handlers. Everything here is read-only.
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatProxy,
    pub gemini_status: StatusProbe,
    pub groq: Arc<GroqProvider>,
    pub groq_credential: ProviderConfig,
    pub groq_status: StatusProbe,
}

/// A running server.
pub struct Server {
    /// The address the server is actually listening on.
    pub addr: SocketAddr,
    pub handle: JoinHandle<()>,
}

pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/provider-status", get(handlers::provider_status))
        .route("/gemini-status", get(handlers::provider_status))
        .route("/groq/chat", post(groq::chat))
        .route("/groq-status", get(groq::status))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(origin = %o, error = %e, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Bind `addr` and serve in a background task.
pub async fn start(
    state: AppState,
    addr: SocketAddr,
    cors_origins: &[String],
) -> std::io::Result<Server> {
    let app = router(state, cors_origins);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("server error: {e}");
        }
    });

    info!(addr = %bound_addr, "tutor proxy listening");
    Ok(Server {
        addr: bound_addr,
        handle,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

use super::sse::{SseDecoder, SseEvent};
use super::{GenerateFuture, GenerationParams, ProbeFuture, ProviderError, TextGenerationProvider};
use anyhow::anyhow;
use futures_core::stream::BoxStream;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Model used by [`GroqProvider::probe`]; the cheapest one Groq serves.
const PROBE_MODEL: &str = "llama3-8b-8192";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroqRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroqMessage {
    pub role: GroqRole,
    pub content: String,
}

impl GroqMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: GroqRole::User,
            content: content.into(),
        }
    }
}

/// Per-request sampling settings for the chat-completions endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct GroqConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            top_p: 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroqUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroqReply {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<GroqUsage>,
}

#[derive(Clone)]
pub struct GroqProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

impl std::fmt::Debug for GroqProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqProvider")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl GroqProvider {
    pub fn new(http: reqwest::Client, api_key: String) -> anyhow::Result<Self> {
        Self::with_base(http, api_key, DEFAULT_MODEL.to_string(), DEFAULT_API_BASE)
    }

    pub fn with_base(
        http: reqwest::Client,
        api_key: String,
        model: String,
        api_base: &str,
    ) -> anyhow::Result<Self> {
        let base = if api_base.ends_with('/') {
            Url::parse(api_base)?
        } else {
            Url::parse(&format!("{api_base}/"))?
        };
        Ok(Self {
            http,
            api_key,
            model,
            endpoint: base.join("openai/v1/chat/completions")?,
        })
    }

    fn headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut h = HeaderMap::new();
        h.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let v = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| ProviderError::Decode(format!("API key is not a valid header: {e}")))?;
        h.insert(AUTHORIZATION, v);
        Ok(h)
    }

    async fn send(&self, body: &CompletionRequest<'_>) -> Result<reqwest::Response, ProviderError> {
        let resp = self
            .http
            .post(self.endpoint.clone())
            .headers(self.headers()?)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }
        Ok(resp)
    }

    async fn complete(&self, body: &CompletionRequest<'_>) -> Result<CompletionResponse, ProviderError> {
        let bytes = self.send(body).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    /// One non-streaming completion.
    pub async fn chat(
        &self,
        messages: &[GroqMessage],
        config: &GroqConfig,
    ) -> Result<GroqReply, ProviderError> {
        let body = CompletionRequest::new(messages, config, false);
        let resp = self.complete(&body).await?;

        let content = resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        Ok(GroqReply {
            content,
            usage: resp.usage,
        })
    }

    /// Start a streamed completion; yields content deltas in arrival order.
    pub async fn stream_chat(
        &self,
        messages: &[GroqMessage],
        config: &GroqConfig,
    ) -> Result<BoxStream<'static, anyhow::Result<String>>, ProviderError> {
        let body = CompletionRequest::new(messages, config, true);
        let resp = self.send(&body).await?;

        let (tx, rx) = mpsc::channel::<anyhow::Result<String>>(64);

        tokio::spawn(async move {
            let mut stream = resp.bytes_stream();
            let mut decoder = SseDecoder::new();

            while let Some(item) = stream.next().await {
                let bytes = match item {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx.send(Err(anyhow!(e).context("network stream error"))).await;
                        return;
                    }
                };

                let events = match decoder.push(&bytes) {
                    Ok(evs) => evs,
                    Err(e) => {
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                };

                for ev in events {
                    if !forward(&tx, ev).await {
                        return;
                    }
                }
            }

            if let Some(ev) = decoder.finish() {
                forward(&tx, ev).await;
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)) as BoxStream<'static, anyhow::Result<String>>)
    }
}

/// Send one decoded event downstream. Returns false once the stream is over.
async fn forward(tx: &mpsc::Sender<anyhow::Result<String>>, ev: SseEvent) -> bool {
    let data = match ev {
        SseEvent::Done => return false,
        SseEvent::Data(data) => data,
    };

    match serde_json::from_str::<StreamChunk>(&data) {
        Ok(chunk) => {
            let delta = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.delta)
                .and_then(|d| d.content)
                .unwrap_or_default();
            if delta.is_empty() {
                return true;
            }
            tx.send(Ok(delta)).await.is_ok()
        }
        Err(e) => {
            let _ = tx
                .send(Err(anyhow!(e).context("failed to parse SSE JSON")))
                .await;
            false
        }
    }
}

impl TextGenerationProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn generate(&self, prompt: String, params: GenerationParams) -> GenerateFuture<'_> {
        Box::pin(async move {
            // top_k has no chat-completions equivalent.
            let defaults = GroqConfig::default();
            let config = GroqConfig {
                model: self.model.clone(),
                temperature: params.temperature.unwrap_or(defaults.temperature),
                max_tokens: params.max_output_tokens.unwrap_or(defaults.max_tokens),
                top_p: params.top_p.unwrap_or(defaults.top_p),
            };
            let reply = self.chat(&[GroqMessage::user(prompt)], &config).await?;
            Ok(Some(reply.content).filter(|c| !c.is_empty()))
        })
    }

    fn probe(&self) -> ProbeFuture<'_> {
        Box::pin(async move {
            let messages = [GroqMessage::user("Hello")];
            let body = CompletionRequest {
                messages: &messages,
                model: PROBE_MODEL,
                temperature: None,
                max_tokens: Some(1),
                top_p: None,
                stream: false,
            };
            let resp = self.complete(&body).await?;
            match resp.choices.first().and_then(|c| c.message.as_ref()) {
                Some(_) => Ok(()),
                None => Err(ProviderError::Decode("Unexpected response format".into())),
            }
        })
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [GroqMessage],
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    stream: bool,
}

impl<'a> CompletionRequest<'a> {
    fn new(messages: &'a [GroqMessage], config: &'a GroqConfig, stream: bool) -> Self {
        Self {
            messages,
            model: &config.model,
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
            top_p: Some(config.top_p),
            stream,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<GroqUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<ChoiceMessage>,
}

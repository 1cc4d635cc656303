use super::{GenerateFuture, GenerationParams, ProbeFuture, ProviderError, TextGenerationProvider};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Clone)]
pub struct GoogleProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_base: Url,
}

impl GoogleProvider {
    pub fn new(http: reqwest::Client, api_key: String) -> anyhow::Result<Self> {
        Self::with_base(http, api_key, DEFAULT_MODEL.to_string(), DEFAULT_API_BASE)
    }

    /// Build against a custom API base (a proxy, or a mock server in tests).
    pub fn with_base(
        http: reqwest::Client,
        api_key: String,
        model: String,
        api_base: &str,
    ) -> anyhow::Result<Self> {
        // Url::join drops the last path segment unless the base ends in '/'.
        let api_base = if api_base.ends_with('/') {
            Url::parse(api_base)?
        } else {
            Url::parse(&format!("{api_base}/"))?
        };
        Ok(Self {
            http,
            api_key,
            model,
            api_base,
        })
    }

    fn build_url(&self) -> Result<Url, ProviderError> {
        // Docs: https://ai.google.dev/api/generate-content
        let mut url = self
            .api_base
            .join(&format!("v1/models/{}:generateContent", self.model))
            .map_err(|e| ProviderError::Decode(format!("invalid Gemini URL: {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    fn headers(&self) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        h
    }

    /// POST a generateContent body; non-2xx becomes `ProviderError::Status`.
    ///
    /// The request URL carries the key, so it is stripped from transport errors.
    async fn post(&self, body: &GenerateContentRequest) -> Result<reqwest::Response, ProviderError> {
        let resp = self
            .http
            .post(self.build_url()?)
            .headers(self.headers())
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }
        Ok(resp)
    }
}

impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("model", &self.model)
            .field("api_base", &self.api_base.as_str())
            .finish_non_exhaustive()
    }
}

impl TextGenerationProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn generate(&self, prompt: String, params: GenerationParams) -> GenerateFuture<'_> {
        Box::pin(async move {
            let body = GenerateContentRequest::new(prompt, params);
            let bytes = self
                .post(&body)
                .await?
                .bytes()
                .await
                .map_err(|e| ProviderError::Transport(e.without_url()))?;
            let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
                .map_err(|e| ProviderError::Decode(e.to_string()))?;
            Ok(extract_text(&parsed))
        })
    }

    /// Any 2xx counts; the reply body is not inspected.
    fn probe(&self) -> ProbeFuture<'_> {
        Box::pin(async move {
            let body = GenerateContentRequest::new("Hello".to_string(), GenerationParams::default());
            self.post(&body).await.map(|_| ())
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationParams>,
}

impl GenerateContentRequest {
    fn new(prompt: String, params: GenerationParams) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: (!params.is_empty()).then_some(params),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Text of the first part of the first candidate, if any.
fn extract_text(r: &GenerateContentResponse) -> Option<String> {
    let cand = r.candidates.first()?;
    let content = cand.content.as_ref()?;
    let text = content.parts.first()?.text.as_ref()?;
    if text.is_empty() {
        None
    } else {
        Some(text.clone())
    }
}

// ABOUTME: sends a single prompt to the local model server and returns its raw reply text.
// ABOUTME: one blocking request per turn with a fixed low temperature and a hard timeout.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

/// Prefixes of replies that carry a failure report instead of model output.
pub const ERROR_MARKERS: &[&str] = &["Erro de conexão:", "Erro inesperado:"];

pub const DEFAULT_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "meuassistente";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_TIMEOUT_SEC: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    ErrorReply(String),
    #[error("unexpected backend error: {0}")]
    Unexpected(String),
}

pub fn is_error_reply(reply: &str) -> bool {
    ERROR_MARKERS.iter().any(|m| reply.starts_with(m))
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SEC),
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, serde::Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, serde::Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

pub struct OllamaBackend {
    http: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaBackend {
    pub fn new(config: OllamaConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl Backend for OllamaBackend {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        debug!(url = %self.config.url, model = %self.config.model, prompt_chars = prompt.len(), "sending prompt");

        let response = self
            .http
            .post(&self.config.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let parsed: GenerateResponse = response.json().await?;

        debug!(reply_chars = parsed.response.len(), "received reply");
        Ok(parsed.response.trim().to_string())
    }
}

//! LLM backend abstraction and implementations.
//!
//! [`CompletionModel`] is the seam between the engine and the external
//! language-model capability: given system instructions, a user prompt, a
//! temperature and an output bound, return free text or fail. The
//! production implementation is [`LlmBackend`], an enum dispatching to an
//! OpenAI-compatible API or the Anthropic Messages API over `reqwest`.
//! Tests substitute their own implementations.

use std::future::Future;

use serde_json::Value;

use crate::config::{BackendType, LlmBackendConfig};
use crate::error::EngineError;

/// One completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instructions.
    pub system: String,
    /// User prompt.
    pub user: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum output tokens.
    pub max_tokens: u32,
}

/// An external text-completion capability.
///
/// Implementations must be shareable across the concurrent workers of a
/// batch. Calls may fail transiently; callers decide whether a failure is
/// masked or propagated.
pub trait CompletionModel: Send + Sync {
    /// Send a request and return the response text.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, EngineError>> + Send;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// The production completion model: a chat API reached over HTTP.
pub enum LlmBackend {
    /// OpenAI-compatible chat completions (`OpenAI`, `DeepSeek`, Ollama).
    OpenAi(OpenAiBackend),
    /// Anthropic Messages API.
    Anthropic(AnthropicBackend),
}

impl CompletionModel for LlmBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, EngineError> {
        match self {
            Self::OpenAi(backend) => backend.complete(request).await,
            Self::Anthropic(backend) => backend.complete(request).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }
}

/// Connection details shared by both providers.
struct Endpoint {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl Endpoint {
    fn new(config: &LlmBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// POST `body` and return the decoded JSON reply. A non-2xx status is
    /// an error carrying the provider's response text.
    async fn post(
        &self,
        provider: &str,
        request: reqwest::RequestBuilder,
        body: &Value,
    ) -> Result<Value, EngineError> {
        let response = request
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| EngineError::LlmBackend(format!("{provider} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            return Err(EngineError::LlmBackend(format!(
                "{provider} returned {status}: {detail}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| EngineError::LlmBackend(format!("{provider} reply is not JSON: {e}")))
    }
}

/// Chat completions at `{api_url}/chat/completions`, Bearer auth. The
/// system prompt travels as the first message.
pub struct OpenAiBackend {
    endpoint: Endpoint,
}

impl OpenAiBackend {
    /// Create a backend for the configured endpoint.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self {
            endpoint: Endpoint::new(config),
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, EngineError> {
        let endpoint = &self.endpoint;
        let body = serde_json::json!({
            "model": endpoint.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user}
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens
        });
        let call = endpoint
            .client
            .post(format!("{}/chat/completions", endpoint.api_url))
            .bearer_auth(&endpoint.api_key);

        let reply = endpoint.post("OpenAI", call, &body).await?;
        extract_openai_content(&reply)
    }
}

/// `choices[0].message.content` of a chat completions reply.
fn extract_openai_content(reply: &Value) -> Result<String, EngineError> {
    reply
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            EngineError::LlmBackend("OpenAI reply missing choices[0].message.content".to_owned())
        })
}

/// Messages API at `{api_url}/messages`, `x-api-key` auth. The system
/// prompt is a top-level field.
pub struct AnthropicBackend {
    endpoint: Endpoint,
}

/// Pinned Messages API version header.
const ANTHROPIC_VERSION: &str = "2023-06-01";

impl AnthropicBackend {
    /// Create a backend for the configured endpoint.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self {
            endpoint: Endpoint::new(config),
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, EngineError> {
        let endpoint = &self.endpoint;
        let body = serde_json::json!({
            "model": endpoint.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "system": request.system,
            "messages": [
                {"role": "user", "content": request.user}
            ]
        });
        let call = endpoint
            .client
            .post(format!("{}/messages", endpoint.api_url))
            .header("x-api-key", &endpoint.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);

        let reply = endpoint.post("Anthropic", call, &body).await?;
        extract_anthropic_content(&reply)
    }
}

/// `content[0].text` of a Messages API reply.
fn extract_anthropic_content(reply: &Value) -> Result<String, EngineError> {
    reply
        .pointer("/content/0/text")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            EngineError::LlmBackend("Anthropic reply missing content[0].text".to_owned())
        })
}

/// Build the backend selected by `config.backend_type`.
pub fn create_backend(config: &LlmBackendConfig) -> LlmBackend {
    match config.backend_type {
        BackendType::OpenAi => LlmBackend::OpenAi(OpenAiBackend::new(config)),
        BackendType::Anthropic => LlmBackend::Anthropic(AnthropicBackend::new(config)),
    }
}

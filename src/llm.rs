//! Language-model providers and provider selection.
//!
//! The pipeline talks to a model only through the [`LanguageModel`] trait.
//! [`LlmClient`] implements it over HTTP for every supported provider.
//!
//! # Supported Providers
//!
//! | Provider | Endpoint | Authentication |
//! |----------|----------|----------------|
//! | DeepSeek | OpenAI-compatible, configurable | Bearer token |
//! | Anthropic | `api.anthropic.com` | x-api-key header |
//! | OpenAI | `api.openai.com` | Bearer token |
//! | Ollama | Local (configurable) | None |
//!
//! # Selection
//!
//! Without a pinned provider the first configured credential wins, in the
//! order DeepSeek, Anthropic, OpenAI. Ollama needs no credential and is only
//! used when pinned. Selection happens once, in
//! [`ModelSelection::from_config`]; a missing credential is remembered and
//! surfaced as [`SafetyError::Configuration`] when a step needs the model.
//!
//! Requests are sent once. There is no retry, and no timeout unless
//! `request_timeout_secs` is configured.
//!
//! # Example
//!
//! ```
//! use safesheet::{config::LlmConfig, llm::ModelSelection};
//!
//! let config = LlmConfig {
//!     anthropic_api_key: Some("sk-ant-test".into()),
//!     ..Default::default()
//! };
//!
//! let selection = ModelSelection::from_config(&config);
//! assert_eq!(selection.model().unwrap().name(), "anthropic");
//! ```

use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::LlmConfig,
    error::{SafetyError, configuration_error, http_error, malformed_response_error, transport_error}
};

const DEEPSEEK_ENDPOINT: &str = "https://api.deepseek.com/v1";
const DEEPSEEK_MODEL: &str = "deepseek-chat";
const ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
const OPENAI_MODEL: &str = "gpt-4o";
const OLLAMA_MODEL: &str = "llama3.2";
const OLLAMA_URL: &str = "http://localhost:11434";
const TEMPERATURE: f32 = 0.1;

/// Message used when no provider credential is available
pub const MISSING_CREDENTIALS: &str =
    "No LLM API key found. Set DEEPSEEK_API_KEY, ANTHROPIC_API_KEY, or OPENAI_API_KEY";

/// A model that turns a prompt into text
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Short provider name used in logs and reports
    fn name(&self) -> &str;

    /// Send one prompt and return the raw reply
    async fn complete(&self, prompt: &str) -> Result<String, SafetyError>;
}

/// Provider families, in fallback order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    DeepSeek,
    Anthropic,
    OpenAI,
    Ollama
}

impl ProviderKind {
    /// Cloud providers tried when nothing is pinned
    pub const FALLBACK_ORDER: [ProviderKind; 3] = [Self::DeepSeek, Self::Anthropic, Self::OpenAI];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek",
            Self::Anthropic => "anthropic",
            Self::OpenAI => "openai",
            Self::Ollama => "ollama"
        }
    }

    /// Default model identifier
    pub fn default_model(self) -> &'static str {
        match self {
            Self::DeepSeek => DEEPSEEK_MODEL,
            Self::Anthropic => ANTHROPIC_MODEL,
            Self::OpenAI => OPENAI_MODEL,
            Self::Ollama => OLLAMA_MODEL
        }
    }

    /// Environment variable holding the credential, if any
    pub fn key_variable(self) -> Option<&'static str> {
        match self {
            Self::DeepSeek => Some("DEEPSEEK_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Ollama => None
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = SafetyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deepseek" => Ok(Self::DeepSeek),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            other => Err(configuration_error(format!(
                "Unknown LLM provider '{}'. Expected deepseek, anthropic, openai or ollama",
                other
            )))
        }
    }
}

/// Provider configuration with authentication credentials.
#[derive(Clone, PartialEq, Eq)]
pub enum LlmProvider {
    /// DeepSeek through an OpenAI-compatible endpoint
    DeepSeek {
        api_key:  String,
        /// Base URL; `/chat/completions` is appended
        endpoint: String,
        model:    String
    },
    /// Anthropic API (Claude models)
    Anthropic {
        api_key: String,
        model:   String
    },
    /// OpenAI API
    OpenAI {
        api_key: String,
        model:   String
    },
    /// Local Ollama instance
    Ollama {
        /// Base URL (e.g., "http://localhost:11434")
        base_url: String,
        model:    String
    }
}

impl LlmProvider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::DeepSeek {
                ..
            } => ProviderKind::DeepSeek,
            Self::Anthropic {
                ..
            } => ProviderKind::Anthropic,
            Self::OpenAI {
                ..
            } => ProviderKind::OpenAI,
            Self::Ollama {
                ..
            } => ProviderKind::Ollama
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::DeepSeek {
                model, ..
            }
            | Self::Anthropic {
                model, ..
            }
            | Self::OpenAI {
                model, ..
            }
            | Self::Ollama {
                model, ..
            } => model
        }
    }

    /// Build the provider of `kind` from configuration, if its credential is
    /// present
    pub fn from_config(kind: ProviderKind, config: &LlmConfig) -> Option<Self> {
        let model = |fallback: &str| config.model.clone().unwrap_or_else(|| fallback.to_string());
        match kind {
            ProviderKind::DeepSeek => config.deepseek_api_key.clone().map(|api_key| Self::DeepSeek {
                api_key,
                endpoint: config
                    .deepseek_endpoint
                    .clone()
                    .unwrap_or_else(|| DEEPSEEK_ENDPOINT.to_string()),
                model: config
                    .model
                    .clone()
                    .or_else(|| config.deepseek_model.clone())
                    .unwrap_or_else(|| DEEPSEEK_MODEL.to_string())
            }),
            ProviderKind::Anthropic => config.anthropic_api_key.clone().map(|api_key| Self::Anthropic {
                api_key,
                model: model(ANTHROPIC_MODEL)
            }),
            ProviderKind::OpenAI => config.openai_api_key.clone().map(|api_key| Self::OpenAI {
                api_key,
                model: model(OPENAI_MODEL)
            }),
            ProviderKind::Ollama => Some(Self::Ollama {
                base_url: config
                    .ollama_url
                    .clone()
                    .unwrap_or_else(|| OLLAMA_URL.to_string()),
                model:    model(OLLAMA_MODEL)
            })
        }
    }
}

// Keys stay out of logs and panic messages
impl fmt::Debug for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmProvider")
            .field("kind", &self.kind())
            .field("model", &self.model())
            .finish_non_exhaustive()
    }
}

/// Cloud providers with a configured credential, in fallback order
pub fn candidate_providers(config: &LlmConfig) -> Vec<LlmProvider> {
    ProviderKind::FALLBACK_ORDER
        .iter()
        .filter_map(|kind| LlmProvider::from_config(*kind, config))
        .collect()
}

/// Pick exactly one provider: the pinned one, or the first candidate
pub fn resolve_provider(config: &LlmConfig) -> Result<LlmProvider, SafetyError> {
    if let Some(pinned) = config.provider.as_deref() {
        let kind: ProviderKind = pinned.parse()?;
        return LlmProvider::from_config(kind, config).ok_or_else(|| {
            configuration_error(format!(
                "Provider '{}' selected but {} is not set",
                kind,
                kind.key_variable().unwrap_or("its credential")
            ))
        });
    }
    candidate_providers(config)
        .into_iter()
        .next()
        .ok_or_else(|| configuration_error(MISSING_CREDENTIALS))
}

/// Model resolved once per pipeline
#[derive(Clone)]
pub enum ModelSelection {
    Ready(Arc<dyn LanguageModel>),
    /// No usable provider; holds the configuration error message
    Unconfigured(String)
}

impl ModelSelection {
    pub fn from_config(config: &LlmConfig) -> Self {
        match resolve_provider(config) {
            Ok(provider) => {
                debug!(provider = %provider.kind(), model = provider.model(), "language model selected");
                let timeout = config.request_timeout_secs.map(Duration::from_secs);
                Self::Ready(Arc::new(LlmClient::new(provider, timeout)))
            }
            Err(SafetyError::Configuration(message)) => Self::Unconfigured(message),
            Err(other) => Self::Unconfigured(other.to_string())
        }
    }

    pub fn ready(model: impl LanguageModel + 'static) -> Self {
        Self::Ready(Arc::new(model))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The selected model, or the configuration error recorded at selection
    pub fn model(&self) -> Result<&Arc<dyn LanguageModel>, SafetyError> {
        match self {
            Self::Ready(model) => Ok(model),
            Self::Unconfigured(message) => Err(configuration_error(message.clone()))
        }
    }
}

impl fmt::Debug for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(model) => f.debug_tuple("Ready").field(&model.name()).finish(),
            Self::Unconfigured(message) => f.debug_tuple("Unconfigured").field(message).finish()
        }
    }
}

/// HTTP client for one provider.
///
/// Handles provider-specific request formatting and response parsing.
pub struct LlmClient {
    provider: LlmProvider,
    client:   reqwest::Client
}

#[derive(Serialize)]
struct ChatRequest {
    model:       String,
    messages:    Vec<ChatMessage>,
    temperature: f32
}

#[derive(Serialize)]
struct ChatMessage {
    role:    String,
    content: String
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>
}

#[derive(Serialize)]
struct AnthropicRequest {
    model:       String,
    max_tokens:  u32,
    temperature: f32,
    messages:    Vec<ChatMessage>
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String
}

#[derive(Serialize)]
struct OllamaRequest {
    model:   String,
    prompt:  String,
    stream:  bool,
    options: OllamaOptions
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String
}

impl LlmClient {
    /// Create a client; `timeout` of `None` leaves requests unbounded
    pub fn new(provider: LlmProvider, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());
        Self {
            provider,
            client
        }
    }

    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }

    async fn call_chat_completions(
        &self,
        base_url: &str,
        api_key: &str,
        model: &str,
        prompt: &str
    ) -> Result<String, SafetyError> {
        let request = ChatRequest {
            model:       model.to_string(),
            messages:    vec![ChatMessage {
                role:    String::from("user"),
                content: prompt.to_string()
            }],
            temperature: TEMPERATURE
        };
        let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(http_error)?;
        let response = check_status(self.name(), response).await?;
        let result: ChatResponse = response.json().await.map_err(http_error)?;
        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| malformed_response_error(format!("Empty response from {}", self.name()), ""))
    }

    async fn call_anthropic(&self, api_key: &str, model: &str, prompt: &str) -> Result<String, SafetyError> {
        let request = AnthropicRequest {
            model:       model.to_string(),
            max_tokens:  4096,
            temperature: TEMPERATURE,
            messages:    vec![ChatMessage {
                role:    String::from("user"),
                content: prompt.to_string()
            }]
        };
        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await
            .map_err(http_error)?;
        let response = check_status(self.name(), response).await?;
        let result: AnthropicResponse = response.json().await.map_err(http_error)?;
        let text: String = result.content.into_iter().map(|c| c.text).collect();
        if text.is_empty() {
            return Err(malformed_response_error("Empty response from anthropic", ""));
        }
        Ok(text)
    }

    async fn call_ollama(&self, base_url: &str, model: &str, prompt: &str) -> Result<String, SafetyError> {
        let request = OllamaRequest {
            model:   model.to_string(),
            prompt:  prompt.to_string(),
            stream:  false,
            options: OllamaOptions {
                temperature: TEMPERATURE
            }
        };
        let url = format!("{}/api/generate", base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(http_error)?;
        let response = check_status(self.name(), response).await?;
        let result: OllamaResponse = response.json().await.map_err(http_error)?;
        Ok(result.response)
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    fn name(&self) -> &str {
        self.provider.kind().as_str()
    }

    async fn complete(&self, prompt: &str) -> Result<String, SafetyError> {
        debug!(provider = self.name(), prompt_len = prompt.len(), "sending prompt");
        match &self.provider {
            LlmProvider::DeepSeek {
                api_key,
                endpoint,
                model
            } => {
                self.call_chat_completions(endpoint, api_key, model, prompt)
                    .await
            }
            LlmProvider::OpenAI {
                api_key,
                model
            } => {
                self.call_chat_completions("https://api.openai.com/v1", api_key, model, prompt)
                    .await
            }
            LlmProvider::Anthropic {
                api_key,
                model
            } => self.call_anthropic(api_key, model, prompt).await,
            LlmProvider::Ollama {
                base_url,
                model
            } => self.call_ollama(base_url, model, prompt).await
        }
    }
}

async fn check_status(provider: &str, response: reqwest::Response) -> Result<reqwest::Response, SafetyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match status.as_u16() {
        401 => format!("{} rejected the request: invalid API key", provider),
        429 => format!("{} quota exceeded or rate limit reached", provider),
        _ => {
            let text = response.text().await.unwrap_or_default();
            format!("{} API error {}: {}", provider, status, text)
        }
    };
    Err(transport_error(message))
}

/// Body of the fenced code blocks in a reply, or the trimmed reply when it has
/// none
///
/// Models often wrap SQL or JSON in Markdown fences (```` ```sql ````) even
/// when asked not to. Lines of all fenced blocks are joined in order.
pub fn strip_code_fences(reply: &str) -> String {
    if !reply.contains("```") {
        return reply.trim().to_string();
    }
    let mut inside = false;
    let mut lines = Vec::new();
    for line in reply.lines() {
        if line.trim_start().starts_with("```") {
            inside = !inside;
            continue;
        }
        if inside {
            lines.push(line);
        }
    }
    let body = lines.join("\n");
    let body = body.trim();
    if body.is_empty() {
        reply.replace("```", "").trim().to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("  SELECT 1;\n"), "SELECT 1;");
        assert_eq!(
            strip_code_fences("Here you go:\n```sql\nDELETE FROM t;\n```\nDone."),
            "DELETE FROM t;"
        );
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("DeepSeek".parse::<ProviderKind>().ok(), Some(ProviderKind::DeepSeek));
        assert_eq!(" openai ".parse::<ProviderKind>().ok(), Some(ProviderKind::OpenAI));
        assert!(matches!(
            "gemini".parse::<ProviderKind>(),
            Err(SafetyError::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let provider = LlmProvider::OpenAI {
            api_key: "sk-secret".into(),
            model:   "gpt-4o".into()
        };
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("gpt-4o"));
    }
}

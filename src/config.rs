//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables (a `.env` file in the current directory is read
//!    first)
//! 3. `.safesheet.toml` in current directory
//! 4. `~/.config/safesheet/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [llm]
//! provider = "anthropic"       # deepseek, anthropic, openai, ollama
//! model = "claude-sonnet-4-20250514"
//! anthropic_api_key = "sk-ant-..."
//! ollama_url = "http://localhost:11434"
//!
//! [analysis]
//! include_rollback = true
//! include_dry_run = false
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `DEEPSEEK_API_KEY` | DeepSeek key (first in fallback order) |
//! | `DEEPSEEK_ENDPOINT` | OpenAI-compatible DeepSeek base URL |
//! | `DEEPSEEK_MODEL` | DeepSeek model identifier |
//! | `ANTHROPIC_API_KEY` | Anthropic key (second in fallback order) |
//! | `OPENAI_API_KEY` | OpenAI key (third in fallback order) |
//! | `LLM_PROVIDER` | Pin one provider instead of the fallback order |
//! | `LLM_MODEL` | Model identifier for the pinned provider |
//! | `OLLAMA_URL` | Ollama base URL |

use std::{
    env, fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;

use crate::error::{AppResult, config_error};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm:      LlmConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig
}

/// Language-model provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Pinned provider name; `None` means first available credential
    pub provider:             Option<String>,
    /// Model override for whichever provider is selected
    pub model:                Option<String>,
    pub deepseek_api_key:     Option<String>,
    pub deepseek_endpoint:    Option<String>,
    pub deepseek_model:       Option<String>,
    pub anthropic_api_key:    Option<String>,
    pub openai_api_key:       Option<String>,
    pub ollama_url:           Option<String>,
    /// Per-request timeout; unset means the caller enforces timeouts
    pub request_timeout_secs: Option<u64>
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider:             None,
            model:                None,
            deepseek_api_key:     None,
            deepseek_endpoint:    None,
            deepseek_model:       None,
            anthropic_api_key:    None,
            openai_api_key:       None,
            ollama_url:           Some(String::from("http://localhost:11434")),
            request_timeout_secs: None
        }
    }
}

/// Defaults for the rule-based pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "enabled")]
    pub include_rollback: bool,
    #[serde(default = "enabled")]
    pub include_dry_run:  bool
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            include_rollback: true,
            include_dry_run:  true
        }
    }
}

fn enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from files and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (including `.env`)
    /// 2. Config file in current directory (.safesheet.toml)
    /// 3. Config file in home directory (~/.config/safesheet/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("safesheet")
                .join("config.toml");
            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        let local_config = PathBuf::from(".safesheet.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Override values with environment variables read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("DEEPSEEK_API_KEY") {
            self.llm.deepseek_api_key = Some(key);
        }
        if let Some(endpoint) = non_empty("DEEPSEEK_ENDPOINT") {
            self.llm.deepseek_endpoint = Some(endpoint);
        }
        if let Some(model) = non_empty("DEEPSEEK_MODEL") {
            self.llm.deepseek_model = Some(model);
        }
        if let Some(key) = non_empty("ANTHROPIC_API_KEY") {
            self.llm.anthropic_api_key = Some(key);
        }
        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.llm.openai_api_key = Some(key);
        }
        if let Some(provider) = non_empty("LLM_PROVIDER") {
            self.llm.provider = Some(provider);
        }
        if let Some(model) = non_empty("LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Some(url) = non_empty("OLLAMA_URL") {
            self.llm.ollama_url = Some(url);
        }
    }
}

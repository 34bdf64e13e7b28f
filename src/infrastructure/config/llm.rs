//! LLM provider configuration.
//!
//! The same provider backs the inventory assistant and ingredient analysis
//! for demand calculations.

use serde::{Deserialize, Serialize};

/// LLM provider configuration.
///
/// API keys are read from environment variables (`ANTHROPIC_API_KEY` or
/// `OPENAI_API_KEY`) at runtime, never from the file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Defaults to OpenAI.
    #[serde(default)]
    pub provider: LlmProvider,

    /// Used when `provider` is set to `anthropic`.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Used when `provider` is set to `openai`.
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// LLM provider selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Anthropic Claude models.
    Anthropic,
    /// OpenAI GPT models.
    #[default]
    OpenAi,
}

impl LlmProvider {
    /// Environment variable holding this provider's API key.
    #[must_use]
    pub const fn key_var(self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

/// Model settings shared by both providers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSettings<'a> {
    pub model: &'a str,
    pub temperature: f64,
    pub max_tokens: usize,
}

/// Anthropic-specific configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnthropicConfig {
    /// Defaults to "claude-sonnet-4-5".
    #[serde(default = "default_anthropic_model")]
    pub model: String,

    /// Sampling temperature. Defaults to 0.3.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens in the response. Defaults to 1000.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            model: default_anthropic_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// OpenAI-specific configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    /// Defaults to "gpt-4o-mini".
    #[serde(default = "default_openai_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: default_openai_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl LlmConfig {
    /// Settings for the selected provider.
    #[must_use]
    pub fn active(&self) -> ModelSettings<'_> {
        match self.provider {
            LlmProvider::Anthropic => ModelSettings {
                model: &self.anthropic.model,
                temperature: self.anthropic.temperature,
                max_tokens: self.anthropic.max_tokens,
            },
            LlmProvider::OpenAi => ModelSettings {
                model: &self.openai.model,
                temperature: self.openai.temperature,
                max_tokens: self.openai.max_tokens,
            },
        }
    }
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-5".into()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".into()
}

fn default_temperature() -> f64 {
    0.3
}

const fn default_max_tokens() -> usize {
    1000
}

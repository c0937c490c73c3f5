//! Configuration types and defaults for promptlab.

use crate::execution::ExecutionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings for the language-model endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSettings {
    /// Base URL of an OpenAI-compatible API (without `/v1/...`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Environment variable consulted first for the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// API key stored in the config file, used when the environment variable
    /// is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
            api_key_env: default_api_key_env(),
            api_key: None,
        }
    }
}

impl ExecutionSettings {
    /// Resolve the settings against the process environment.
    pub fn resolve(&self) -> Result<ResolvedExecution, ExecutionError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve the settings with a custom environment lookup.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ResolvedExecution, ExecutionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(&self.api_key_env)
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| ExecutionError::MissingApiKey {
                env_var: self.api_key_env.clone(),
            })?;

        Ok(ResolvedExecution {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout_seconds: self.timeout_seconds,
            api_key,
        })
    }
}

/// Execution settings with the API key in hand.
#[derive(Clone)]
pub struct ResolvedExecution {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    pub api_key: String,
}

impl fmt::Debug for ResolvedExecution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedExecution")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("api_key", &mask_key(&self.api_key))
            .finish()
    }
}

/// Mask all but the last four characters of a key.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

// Default value functions for serde
pub(crate) fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}
pub(crate) fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
pub(crate) fn default_temperature() -> f32 {
    0.7
}
pub(crate) fn default_max_tokens() -> u32 {
    1000
}
pub(crate) fn default_timeout_seconds() -> u64 {
    60
}
pub(crate) fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
pub(crate) fn default_lock_stale_minutes() -> u32 {
    120
}

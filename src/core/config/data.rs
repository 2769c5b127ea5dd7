use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::document::Document;

pub const DEFAULT_PROVIDER: &str = "anthropic";
pub const DEFAULT_MAX_TOKENS: u32 = 8000;
pub const DEFAULT_TEMPERATURE: f32 = 1.0;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// A user-defined prompt template invoked as `/name`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CommandConfig {
    pub name: String,
    pub help: Option<String>,
    /// Prompt text containing exactly one `{arg}` placeholder.
    pub template: String,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Provider id (e.g., "anthropic", "openai") used to pick auth headers and defaults
    pub provider: Option<String>,
    /// Overrides the provider's base URL
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub request_timeout_secs: Option<u64>,
    /// Sent as the system message ahead of the conversation
    pub system_prompt: Option<String>,
    /// Transcript log enabled at startup
    pub log_file: Option<String>,
    /// Documents available as `@id`; the built-in samples are used when empty
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn provider_id(&self) -> &str {
        self.provider.as_deref().unwrap_or(DEFAULT_PROVIDER)
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Sets a scalar value by its CLI key. Returns false for unknown keys.
    pub fn set_value(&mut self, key: &str, value: String) -> Result<bool, String> {
        match key {
            "provider" => self.provider = Some(value),
            "base-url" => self.base_url = Some(value),
            "model" => self.model = Some(value),
            "system-prompt" => self.system_prompt = Some(value),
            "log-file" => self.log_file = Some(value),
            "max-tokens" => {
                self.max_tokens = Some(
                    value
                        .parse()
                        .map_err(|_| format!("max-tokens must be a positive integer, got '{value}'"))?,
                )
            }
            "temperature" => {
                self.temperature = Some(
                    value
                        .parse()
                        .map_err(|_| format!("temperature must be a number, got '{value}'"))?,
                )
            }
            "request-timeout" => {
                self.request_timeout_secs = Some(value.parse().map_err(|_| {
                    format!("request-timeout must be a number of seconds, got '{value}'")
                })?)
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Clears a scalar value by its CLI key. Returns false for unknown keys.
    pub fn unset_value(&mut self, key: &str) -> bool {
        match key {
            "provider" => self.provider = None,
            "base-url" => self.base_url = None,
            "model" => self.model = None,
            "system-prompt" => self.system_prompt = None,
            "log-file" => self.log_file = None,
            "max-tokens" => self.max_tokens = None,
            "temperature" => self.temperature = None,
            "request-timeout" => self.request_timeout_secs = None,
            _ => return false,
        }
        true
    }
}

/// Keys accepted by `docchat set` and `docchat unset`.
pub const SETTABLE_KEYS: &[&str] = &[
    "provider",
    "base-url",
    "model",
    "system-prompt",
    "log-file",
    "max-tokens",
    "temperature",
    "request-timeout",
];

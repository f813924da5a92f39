//! Configuration settings for Cutline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub server: ServerSettings,
    pub intent: IntentSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Language model provider settings.
///
/// Any OpenAI-compatible chat completions endpoint works; the defaults point
/// at Gemini's compatibility layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Base URL of the chat completions API.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// API key. Takes precedence over `api_key_env` when set.
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// HTTP timeout for a single model call.
    pub timeout_secs: u64,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 120,
            temperature: 0.2,
        }
    }
}

impl ModelSettings {
    /// Resolve the API key from the config file or the environment.
    ///
    /// Empty values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Intent resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentSettings {
    /// Issue one extra model call when the first pass only produced text.
    pub forced_retry: bool,
    /// Timeline scale the model is told to assume when none is given.
    pub pixels_per_second: u32,
}

impl Default for IntentSettings {
    fn default() -> Self {
        Self {
            forced_retry: true,
            pixels_per_second: 100,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings: Settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Check values that would only fail later, at request time.
    pub fn validate(&self) -> crate::error::Result<()> {
        url::Url::parse(&self.model.base_url).map_err(|e| {
            crate::error::CutlineError::Config(format!(
                "model.base_url '{}' is not a valid URL: {}",
                self.model.base_url, e
            ))
        })?;

        if self.model.model.trim().is_empty() {
            return Err(crate::error::CutlineError::Config(
                "model.model must not be empty".to_string(),
            ));
        }

        if self.intent.pixels_per_second == 0 {
            return Err(crate::error::CutlineError::Config(
                "intent.pixels_per_second must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cutline")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

//! Configuration management for repospec.
//!
//! Settings load from `~/.repospec/settings.json` when present. Environment
//! variables override file values, and CLI flags override both.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::git::DEFAULT_MAX_COMMITS;

/// Default model for convention refinement.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

/// Default provider label.
pub const DEFAULT_LLM_PROVIDER: &str = "openai";

/// LLM refinement settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmSettings {
    /// Whether refinement is enabled at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Provider label, kept for reference; the wire protocol is always
    /// OpenAI-compatible chat completions.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Explicit API key; environment variables are consulted when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the chat-completions endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

impl LlmSettings {
    /// Resolves the API key: explicit setting first, then `LLM_API_KEY`,
    /// then `OPENAI_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| env::var("LLM_API_KEY").ok())
            .or_else(|| env::var("OPENAI_API_KEY").ok())
    }

    /// Resolves the base URL: explicit setting first, then
    /// `LLM_API_BASE_URL`, then the default endpoint.
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .or_else(|| env::var("LLM_API_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string())
    }
}

/// repospec settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Maximum commits sampled for history analysis.
    #[serde(default = "default_max_commits")]
    pub max_commits: usize,

    /// LLM refinement settings.
    #[serde(default)]
    pub llm: LlmSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_commits: default_max_commits(),
            llm: LlmSettings::default(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_provider() -> String {
    DEFAULT_LLM_PROVIDER.to_string()
}

fn default_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}

fn default_max_commits() -> usize {
    DEFAULT_MAX_COMMITS
}

/// Loads settings from a JSON file with environment overrides.
pub struct ConfigManager {
    settings_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self {
            settings_path: Self::default_settings_path(),
        }
    }
}

impl ConfigManager {
    /// Creates a configuration manager for the default settings path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration manager with a custom settings path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            settings_path: path,
        }
    }

    /// The default settings path (`~/.repospec/settings.json`).
    pub fn default_settings_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".repospec")
            .join("settings.json")
    }

    /// Loads settings, applying environment overrides on top of file
    /// values. A missing settings file yields the defaults.
    pub fn load_settings(&self) -> Result<Settings> {
        let mut settings = if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path).with_context(|| {
                format!("Failed to read settings file: {:?}", self.settings_path)
            })?;
            serde_json::from_str(&content).with_context(|| {
                format!("Failed to parse settings file: {:?}", self.settings_path)
            })?
        } else {
            Settings::default()
        };

        apply_env_overrides(&mut settings);
        Ok(settings)
    }
}

/// Applies environment-variable overrides on top of loaded values.
fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(value) = env::var("REPOSPEC_MAX_COMMITS") {
        if let Ok(parsed) = value.parse() {
            settings.max_commits = parsed;
        }
    }
    if let Ok(value) = env::var("REPOSPEC_LLM_ENABLED") {
        settings.llm.enabled = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes");
    }
    if let Ok(value) = env::var("REPOSPEC_LLM_PROVIDER") {
        settings.llm.provider = value;
    }
    if let Ok(value) = env::var("REPOSPEC_LLM_MODEL") {
        settings.llm.model = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("settings.json"));

        let settings = manager.load_settings().unwrap();
        assert_eq!(settings.max_commits, DEFAULT_MAX_COMMITS);
        assert!(settings.llm.enabled);
        assert_eq!(settings.llm.model, DEFAULT_LLM_MODEL);
    }

    #[test]
    fn file_values_are_loaded() {
        let temp_dir = tempdir().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        std::fs::write(
            &settings_path,
            r#"{
                "max_commits": 50,
                "llm": {"enabled": false, "model": "local-model", "base_url": "http://localhost:11434/v1"}
            }"#,
        )
        .unwrap();

        let settings = ConfigManager::with_path(settings_path).load_settings().unwrap();
        assert_eq!(settings.max_commits, 50);
        assert!(!settings.llm.enabled);
        assert_eq!(settings.llm.model, "local-model");
        assert_eq!(
            settings.llm.resolved_base_url(),
            "http://localhost:11434/v1"
        );
    }

    #[test]
    fn env_overrides_file_value() {
        let temp_dir = tempdir().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        std::fs::write(&settings_path, r#"{"max_commits": 50}"#).unwrap();

        env::set_var("REPOSPEC_MAX_COMMITS", "75");
        let settings = ConfigManager::with_path(settings_path).load_settings().unwrap();
        env::remove_var("REPOSPEC_MAX_COMMITS");

        assert_eq!(settings.max_commits, 75);
    }

    #[test]
    fn explicit_api_key_wins_over_environment() {
        let settings = LlmSettings {
            api_key: Some("explicit".to_string()),
            ..LlmSettings::default()
        };
        assert_eq!(settings.resolved_api_key().as_deref(), Some("explicit"));
    }

    #[test]
    fn partial_settings_file_fills_defaults() {
        let temp_dir = tempdir().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        std::fs::write(&settings_path, r#"{"llm": {"model": "custom"}}"#).unwrap();

        let settings = ConfigManager::with_path(settings_path).load_settings().unwrap();
        assert_eq!(settings.max_commits, DEFAULT_MAX_COMMITS);
        assert!(settings.llm.enabled);
        assert_eq!(settings.llm.model, "custom");
    }
}

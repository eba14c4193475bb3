//! Configuration management for the shopvoice CLI
//!
//! Handles loading and saving configuration from ~/.shopvoice/config.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use voice_assistant::AssistantConfig;

/// Configuration for the shopvoice CLI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,

    /// Shopper's bearer token
    #[serde(default)]
    pub token: Option<String>,
}

fn default_server_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_true")]
    pub interim_results: bool,
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    AssistantConfig::default().debounce_ms
}

fn default_cooldown_ms() -> u64 {
    AssistantConfig::default().cooldown_ms
}

fn default_language() -> String {
    AssistantConfig::default().language
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            cooldown_ms: default_cooldown_ms(),
            language: default_language(),
            interim_results: true,
        }
    }
}

impl VoiceConfig {
    pub fn assistant(&self) -> AssistantConfig {
        AssistantConfig {
            debounce_ms: self.debounce_ms,
            cooldown_ms: self.cooldown_ms,
            language: self.language.clone(),
            interim_results: self.interim_results,
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shopvoice")
            .join("config.toml")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a configuration value by key path (e.g., "server.url")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "url"] => Some(self.server.url.clone()),
            ["server", "token"] => self.server.token.clone(),
            ["voice", "debounce_ms"] => Some(self.voice.debounce_ms.to_string()),
            ["voice", "cooldown_ms"] => Some(self.voice.cooldown_ms.to_string()),
            ["voice", "language"] => Some(self.voice.language.clone()),
            ["voice", "interim_results"] => Some(self.voice.interim_results.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key path
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "url"] => self.server.url = value.to_string(),
            ["server", "token"] => {
                self.server.token = (!value.is_empty()).then(|| value.to_string())
            }
            ["voice", "debounce_ms"] => {
                self.voice.debounce_ms = value
                    .parse()
                    .with_context(|| format!("{} expects milliseconds, got {:?}", key, value))?
            }
            ["voice", "cooldown_ms"] => {
                self.voice.cooldown_ms = value
                    .parse()
                    .with_context(|| format!("{} expects milliseconds, got {:?}", key, value))?
            }
            ["voice", "interim_results"] => {
                self.voice.interim_results = value
                    .parse()
                    .with_context(|| format!("{} expects true or false, got {:?}", key, value))?
            }
            ["voice", "language"] => {
                let candidate = VoiceConfig {
                    language: value.to_string(),
                    ..self.voice.clone()
                };
                candidate.assistant().validate()?;
                self.voice = candidate;
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.server.url, "http://localhost:5000");
        assert_eq!(config.voice.debounce_ms, 200);
        assert_eq!(config.voice.cooldown_ms, 1000);
        assert!(config.server.token.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("server.url", "http://shop.local:8080").unwrap();
        config.set("server.token", "abc").unwrap();
        config.set("voice.debounce_ms", "350").unwrap();
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.get("server.url").as_deref(), Some("http://shop.local:8080"));
        assert_eq!(reloaded.get("server.token").as_deref(), Some("abc"));
        assert_eq!(reloaded.voice.assistant().debounce_ms, 350);
        assert_eq!(reloaded.get("voice.interim_results").as_deref(), Some("true"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[voice]\ncooldown_ms = 50\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.voice.cooldown_ms, 50);
        assert_eq!(config.voice.debounce_ms, 200);
        assert_eq!(config.server.url, "http://localhost:5000");
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = Config::default();

        assert!(config.set("voice.debounce_ms", "soon").is_err());
        assert!(config.set("voice.interim_results", "sometimes").is_err());
        assert!(config.set("voice.language", "fr-FR").is_err());
        assert!(config.set("display.theme", "dark").is_err());
        assert_eq!(config.voice.language, "en-US");
    }

    #[test]
    fn test_interim_results_reach_assistant_config() {
        let mut config = Config::default();
        config.set("voice.interim_results", "false").unwrap();

        let assistant = config.voice.assistant();
        assert!(!assistant.interim_results);
        assert!(!assistant.capture_options().interim_results);
        assert_eq!(config.get("voice.interim_results").as_deref(), Some("false"));
    }

    #[test]
    fn test_empty_token_clears() {
        let mut config = Config::default();
        config.set("server.token", "abc").unwrap();
        config.set("server.token", "").unwrap();
        assert_eq!(config.get("server.token"), None);
    }
}

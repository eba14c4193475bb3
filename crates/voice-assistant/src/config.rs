//! Assistant configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ports::CaptureOptions, AssistantError, Result};

/// Timing and locale settings for a capture session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    /// Delay between a final transcript and its dispatch. A newer final
    /// transcript inside this window replaces the pending one.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How long the last processed command is remembered before the same
    /// phrase is accepted again.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// Recognition language handed to the capture engine.
    #[serde(default = "default_language")]
    pub language: String,

    /// Ask the capture engine for interim (partial) results.
    #[serde(default = "default_true")]
    pub interim_results: bool,
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_cooldown_ms() -> u64 {
    1000
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            cooldown_ms: default_cooldown_ms(),
            language: default_language(),
            interim_results: true,
        }
    }
}

impl AssistantConfig {
    /// Zero-delay timings for scripted hosts and tests
    pub fn immediate() -> Self {
        Self {
            debounce_ms: 0,
            cooldown_ms: 0,
            ..Self::default()
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            language: self.language.clone(),
            interim_results: self.interim_results,
        }
    }

    /// Only English recognition is supported.
    pub fn validate(&self) -> Result<()> {
        if !self.language.to_lowercase().starts_with("en") {
            return Err(AssistantError::Config(format!(
                "unsupported recognition language: {}",
                self.language
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let config = AssistantConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(200));
        assert_eq!(config.cooldown(), Duration::from_millis(1000));
        assert_eq!(config.language, "en-US");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AssistantConfig = serde_json::from_str(r#"{"debounceMs": 50}"#).unwrap();
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.cooldown_ms, 1000);
        assert!(config.interim_results);
    }

    #[test]
    fn test_non_english_language_rejected() {
        let config = AssistantConfig {
            language: "fr-FR".to_string(),
            ..AssistantConfig::default()
        };
        assert!(matches!(config.validate(), Err(AssistantError::Config(_))));
    }

    #[test]
    fn test_capture_options_follow_config() {
        let config = AssistantConfig {
            language: "en-GB".to_string(),
            interim_results: false,
            ..AssistantConfig::default()
        };
        assert_eq!(
            config.capture_options(),
            CaptureOptions {
                language: "en-GB".to_string(),
                interim_results: false,
            }
        );
    }
}

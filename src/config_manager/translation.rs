use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the debounced translation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Quiet period before a changed input is sent for translation.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Reported to the client as a counter, never enforced.
    #[serde(default = "default_max_source_chars")]
    pub max_source_chars: usize,

    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_max_source_chars() -> usize {
    2000
}

fn default_languages() -> Vec<String> {
    vec![
        "Sanskrit".to_string(),
        "English".to_string(),
        "Tamil".to_string(),
    ]
}

fn default_language() -> String {
    "sanskrit".to_string()
}

impl TranslationConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_source_chars: default_max_source_chars(),
            languages: default_languages(),
            default_language: default_language(),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Configuration for the OpenAI-compatible chat completion provider used
/// for translation.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub llm_provider: String,

    /// Overrides the provider's default endpoint when set.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub llm_api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub organization_id: Option<String>,

    #[serde(default)]
    pub project_id: Option<String>,

    /// No timeout beyond the transport's own when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_provider() -> String {
    "openai_llm".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

impl LlmConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_provider: default_provider(),
            base_url: None,
            llm_api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            organization_id: None,
            project_id: None,
            request_timeout_secs: None,
        }
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("llm_provider", &self.llm_provider)
            .field("base_url", &self.base_url)
            .field("llm_api_key", &if self.llm_api_key.is_empty() { "" } else { "***" })
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("organization_id", &self.organization_id)
            .field("project_id", &self.project_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_api_key() {
        let config = LlmConfig {
            llm_api_key: "sk-secret".to_string(),
            ..LlmConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("***"));
    }
}

use std::sync::Arc;
use reqwest::Client;
use tracing::info;

use super::client::OpenAICompatibleTranslator;
use super::interface::Translator;
use crate::config_manager::LlmConfig;
use crate::error::TranslateError;

/// Factory for creating translator backends
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Default chat-completion base URL for a provider name.
    pub fn default_base_url(llm_provider: &str) -> Option<&'static str> {
        match llm_provider {
            "openai_llm" | "openai_compatible_llm" => Some("https://api.openai.com/v1"),
            "deepseek_llm" => Some("https://api.deepseek.com/v1"),
            "groq_llm" => Some("https://api.groq.com/openai/v1"),
            "mistral_llm" => Some("https://api.mistral.ai/v1"),
            "gemini_llm" => Some("https://generativelanguage.googleapis.com/v1beta/openai"),
            "zhipu_llm" => Some("https://open.bigmodel.cn/api/paas/v4"),
            "ollama_llm" => Some("http://localhost:11434/v1"),
            _ => None,
        }
    }

    /// Create a translator from the LLM configuration. `base_url` in the
    /// config takes precedence over the provider default.
    pub fn create_translator(config: &LlmConfig) -> Result<Arc<dyn Translator>, TranslateError> {
        info!("Initializing translator: {}", config.llm_provider);

        let base_url = match (&config.base_url, Self::default_base_url(&config.llm_provider)) {
            (Some(url), _) => url.clone(),
            (None, Some(url)) => url.to_string(),
            (None, None) => {
                return Err(TranslateError::UnsupportedProvider(config.llm_provider.clone()))
            }
        };

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Arc::new(OpenAICompatibleTranslator::new(
            client,
            base_url,
            config.llm_api_key.clone(),
            config.model.clone(),
            config.temperature,
            config.organization_id.clone(),
            config.project_id.clone(),
        )))
    }
}

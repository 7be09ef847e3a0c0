use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::interface::{TranslationRequest, TranslationResult, Translator};
use super::prompt::build_prompt;
use crate::error::TranslateError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Translator backed by an OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAICompatibleTranslator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    organization_id: Option<String>,
    project_id: Option<String>,
}

impl OpenAICompatibleTranslator {
    pub fn new(
        client: Client,
        base_url: String,
        api_key: String,
        model: String,
        temperature: f32,
        organization_id: Option<String>,
        project_id: Option<String>,
    ) -> Self {
        info!(
            "Initialized OpenAICompatibleTranslator: model={}, base_url={}",
            model, base_url
        );
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            temperature,
            organization_id,
            project_id,
        }
    }

    async fn complete(&self, prompt: String) -> Result<String, TranslateError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt),
            }],
            temperature: self.temperature,
        };

        let mut request = self.client.post(&url).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }
        if let Some(org) = &self.organization_id {
            request = request.header("OpenAI-Organization", org);
        }
        if let Some(project) = &self.project_id {
            request = request.header("OpenAI-Project", project);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(TranslateError::EmptyReply)
    }
}

#[async_trait]
impl Translator for OpenAICompatibleTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, TranslateError> {
        if request.source_text.trim().is_empty() {
            return Err(TranslateError::EmptySource);
        }

        debug!(
            "Requesting translation into {} ({} chars)",
            request.target_language,
            request.source_text.chars().count()
        );
        let content = self.complete(build_prompt(request)).await?;
        let result = TranslationResult::from_reply(&content)?;
        debug!("Pronunciation: {}", result.pronunciation);
        Ok(result)
    }
}

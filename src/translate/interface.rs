use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// One translation job: the text to translate and the language label to
/// translate it into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub source_text: String,
    pub target_language: String,
}

impl TranslationRequest {
    pub fn new(source_text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            target_language: target_language.into(),
        }
    }
}

/// Parsed translation reply. All three fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translation: String,
    pub pronunciation: String,
    pub phonetic_pronunciation: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReply {
    translation: Option<String>,
    pronunciation: Option<String>,
    phonetic_pronunciation: Option<String>,
}

impl TranslationResult {
    /// Parse the model's reply, which must be a bare JSON object with the
    /// keys `translation`, `pronunciation` and `phoneticPronunciation`.
    pub fn from_reply(content: &str) -> Result<Self, TranslateError> {
        let raw: RawReply = serde_json::from_str(content)?;
        Ok(Self {
            translation: require(raw.translation, "translation")?,
            pronunciation: require(raw.pronunciation, "pronunciation")?,
            phonetic_pronunciation: require(raw.phonetic_pronunciation, "phoneticPronunciation")?,
        })
    }
}

fn require(value: Option<String>, key: &'static str) -> Result<String, TranslateError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(TranslateError::MissingField(key)),
    }
}

/// A backend that turns a [`TranslationRequest`] into a [`TranslationResult`]
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, TranslateError>;
}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::voice::Voice;
use crate::error::SpeechError;

/// Text to speak together with the chosen voice and rate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Utterance {
    pub text: String,
    pub voice: Option<Voice>,
    pub rate: f32,
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    voice: Option<&'a str>,
    language: Option<&'a str>,
    rate: f32,
}

/// Synthesis response containing the generated audio path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisResponse {
    pub audio_path: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// A text-to-speech backend
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    async fn list_voices(&self) -> Result<Vec<Voice>, SpeechError>;

    /// Synthesize the utterance, returning the path of the audio file.
    async fn synthesize(&self, utterance: &Utterance) -> Result<String, SpeechError>;
}

/// Speech engine that talks to the external TTS HTTP service
pub struct HttpSpeechEngine {
    client: Client,
    base_url: String,
}

impl HttpSpeechEngine {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SpeechEngine for HttpSpeechEngine {
    async fn list_voices(&self) -> Result<Vec<Voice>, SpeechError> {
        let url = format!("{}/tts/voices", self.base_url);
        let voices: Vec<Voice> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!("Speech service reported {} voices", voices.len());
        Ok(voices)
    }

    async fn synthesize(&self, utterance: &Utterance) -> Result<String, SpeechError> {
        let url = format!("{}/tts/synthesize", self.base_url);
        let request = SynthesisRequest {
            text: &utterance.text,
            voice: utterance.voice.as_ref().map(|v| v.name.as_str()),
            language: utterance.voice.as_ref().map(|v| v.lang.as_str()),
            rate: utterance.rate,
        };
        debug!("Sending TTS request: text={}, voice={:?}", utterance.text, request.voice);

        let response: SynthesisResponse = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        if response.success {
            debug!("TTS synthesis successful: {}", response.audio_path);
            Ok(response.audio_path)
        } else {
            let error_msg = response.error.unwrap_or_else(|| "Unknown error".to_string());
            error!("TTS synthesis failed: {}", error_msg);
            Err(SpeechError::Synthesis(error_msg))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn lists_voices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tts/voices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Samantha", "lang": "en-US", "default": true},
                {"name": "Lekha", "lang": "hi-IN"}
            ])))
            .mount(&server)
            .await;

        let voices = HttpSpeechEngine::new(server.uri()).list_voices().await.unwrap();
        assert_eq!(voices.len(), 2);
        assert!(voices[0].default);
        assert_eq!(voices[1], Voice::new("Lekha", "hi-IN"));
    }

    #[tokio::test]
    async fn synthesize_sends_voice_and_rate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tts/synthesize"))
            .and(body_partial_json(json!({
                "text": "namaste",
                "voice": "Lekha",
                "language": "hi-IN",
                "rate": 0.5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "audio_path": "cache/namaste.wav",
                "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let utterance = Utterance {
            text: "namaste".to_string(),
            voice: Some(Voice::new("Lekha", "hi-IN")),
            rate: 0.5,
        };
        let path = HttpSpeechEngine::new(format!("{}/", server.uri()))
            .synthesize(&utterance)
            .await
            .unwrap();
        assert_eq!(path, "cache/namaste.wav");
    }

    #[tokio::test]
    async fn unsuccessful_synthesis_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "audio_path": "",
                "success": false,
                "error": "voice not installed"
            })))
            .mount(&server)
            .await;

        let utterance = Utterance {
            text: "hi".to_string(),
            voice: None,
            rate: 0.5,
        };
        let err = HttpSpeechEngine::new(server.uri()).synthesize(&utterance).await.unwrap_err();
        assert!(matches!(err, SpeechError::Synthesis(msg) if msg == "voice not installed"));
    }
}

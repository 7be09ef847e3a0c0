use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the speech synthesis service and playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_tts_base_url")]
    pub tts_base_url: String,

    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,

    /// Locale tag looked up in the voice list before falling back to the
    /// first voice.
    #[serde(default = "default_preferred_locale")]
    pub preferred_locale: String,

    /// How long playback waits for the voice list to be populated.
    #[serde(default = "default_voice_wait_secs")]
    pub voice_wait_secs: u64,

    #[serde(default)]
    pub preprocessor: SpeechPreprocessorConfig,
}

fn default_tts_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_speech_rate() -> f32 {
    0.5
}

fn default_preferred_locale() -> String {
    "hi-IN".to_string()
}

fn default_voice_wait_secs() -> u64 {
    10
}

impl SpeechConfig {
    pub fn voice_wait(&self) -> Duration {
        Duration::from_secs(self.voice_wait_secs)
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            tts_base_url: default_tts_base_url(),
            speech_rate: default_speech_rate(),
            preferred_locale: default_preferred_locale(),
            voice_wait_secs: default_voice_wait_secs(),
            preprocessor: SpeechPreprocessorConfig::default(),
        }
    }
}

/// Configuration for text cleanup before synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechPreprocessorConfig {
    #[serde(default)]
    pub remove_special_char: bool,

    #[serde(default = "default_true")]
    pub ignore_brackets: bool,

    #[serde(default = "default_true")]
    pub ignore_parentheses: bool,

    #[serde(default = "default_true")]
    pub ignore_asterisks: bool,

    #[serde(default = "default_true")]
    pub ignore_angle_brackets: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SpeechPreprocessorConfig {
    fn default() -> Self {
        Self {
            remove_special_char: false,
            ignore_brackets: true,
            ignore_parentheses: true,
            ignore_asterisks: true,
            ignore_angle_brackets: true,
        }
    }
}

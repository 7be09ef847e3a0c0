use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use super::catalog::VoiceCatalog;
use super::engine::{SpeechEngine, Utterance};
use super::preprocess::SpeechTextFilter;
use super::voice::{select_voice, Voice};
use crate::config_manager::SpeechConfig;
use crate::error::SpeechError;

/// Animation state of the on-screen character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterState {
    #[default]
    Idle,
    Speak,
}

/// Result of a successful playback request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playback {
    pub audio_path: String,
    pub voice: Option<Voice>,
}

pub struct AudioPlayer {
    engine: Arc<dyn SpeechEngine>,
    catalog: Arc<VoiceCatalog>,
    filter: SpeechTextFilter,
    rate: f32,
    preferred_locale: String,
    voice_wait: Duration,
    character: watch::Sender<CharacterState>,
    /// Sessions whose client is currently playing audio.
    playing: Mutex<HashSet<String>>,
}

impl AudioPlayer {
    pub fn new(engine: Arc<dyn SpeechEngine>, catalog: Arc<VoiceCatalog>, config: &SpeechConfig) -> Self {
        let (character, _) = watch::channel(CharacterState::Idle);
        Self {
            engine,
            catalog,
            filter: SpeechTextFilter::new(config.preprocessor.clone()),
            rate: config.speech_rate,
            preferred_locale: config.preferred_locale.clone(),
            voice_wait: config.voice_wait(),
            character,
            playing: Mutex::new(HashSet::new()),
        }
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    pub fn character(&self) -> CharacterState {
        *self.character.borrow()
    }

    pub fn subscribe_character(&self) -> watch::Receiver<CharacterState> {
        self.character.subscribe()
    }

    /// Fetch the voice list from the engine and publish it.
    pub async fn refresh_voices(&self) -> Result<usize, SpeechError> {
        let voices = self.engine.list_voices().await?;
        Ok(self.catalog.replace(voices))
    }

    /// Client-reported playback start for `session_id`. The character
    /// speaks while any session is playing.
    pub fn playback_started(&self, session_id: &str) {
        let mut playing = self.playing.lock().unwrap_or_else(|e| e.into_inner());
        if playing.insert(session_id.to_string()) {
            info!("Audio playback started ({})", session_id);
        }
        self.publish(&playing);
    }

    /// Client-reported playback end for `session_id`.
    pub fn playback_ended(&self, session_id: &str) {
        let mut playing = self.playing.lock().unwrap_or_else(|e| e.into_inner());
        if playing.remove(session_id) {
            info!("Audio playback ended ({})", session_id);
        }
        self.publish(&playing);
    }

    /// Forget a session that went away mid-playback.
    pub fn release(&self, session_id: &str) {
        let mut playing = self.playing.lock().unwrap_or_else(|e| e.into_inner());
        if playing.remove(session_id) {
            debug!("Released playback of closed session {}", session_id);
            self.publish(&playing);
        }
    }

    fn publish(&self, playing: &HashSet<String>) {
        let state = if playing.is_empty() {
            CharacterState::Idle
        } else {
            CharacterState::Speak
        };
        self.character.send_if_modified(|current| {
            let changed = *current != state;
            *current = state;
            changed
        });
    }

    /// Build the utterance: preprocessed text, configured rate, and the
    /// voice for `locale` (the preferred locale when `None`).
    pub fn utterance(&self, text: &str, voices: &[Voice], locale: Option<&str>) -> Utterance {
        let locale = locale.unwrap_or(&self.preferred_locale);
        Utterance {
            text: self.filter.apply(text),
            voice: select_voice(voices, locale).cloned(),
            rate: self.rate,
        }
    }

    /// Synthesize `text`. Waits for the voice list if it has not been loaded
    /// yet. The character state is left to the playback events.
    pub async fn play(&self, text: &str, locale: Option<&str>) -> Result<Playback, SpeechError> {
        let voices = tokio::time::timeout(self.voice_wait, self.catalog.ready())
            .await
            .map_err(|_| SpeechError::NoVoices)??;

        let utterance = self.utterance(text, &voices, locale);
        debug!(
            "Speaking with voice {:?}",
            utterance.voice.as_ref().map(|v| v.name.as_str())
        );

        let audio_path = self.engine.synthesize(&utterance).await?;

        Ok(Playback {
            audio_path,
            voice: utterance.voice,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingEngine {
        voices: Vec<Voice>,
        spoken: Mutex<Vec<Utterance>>,
        states_seen: Mutex<Vec<CharacterState>>,
        character: Mutex<Option<watch::Receiver<CharacterState>>>,
        fail: bool,
    }

    impl RecordingEngine {
        fn new(voices: Vec<Voice>, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                voices,
                spoken: Mutex::new(Vec::new()),
                states_seen: Mutex::new(Vec::new()),
                character: Mutex::new(None),
                fail,
            })
        }
    }

    #[async_trait]
    impl SpeechEngine for RecordingEngine {
        async fn list_voices(&self) -> Result<Vec<Voice>, SpeechError> {
            Ok(self.voices.clone())
        }

        async fn synthesize(&self, utterance: &Utterance) -> Result<String, SpeechError> {
            if let Some(rx) = self.character.lock().unwrap().as_ref() {
                self.states_seen.lock().unwrap().push(*rx.borrow());
            }
            self.spoken.lock().unwrap().push(utterance.clone());
            if self.fail {
                Err(SpeechError::Synthesis("boom".to_string()))
            } else {
                Ok("cache/out.wav".to_string())
            }
        }
    }

    fn player(engine: Arc<RecordingEngine>, catalog: Arc<VoiceCatalog>) -> AudioPlayer {
        let player = AudioPlayer::new(engine.clone(), catalog, &SpeechConfig::default());
        *engine.character.lock().unwrap() = Some(player.subscribe_character());
        player
    }

    #[tokio::test]
    async fn speaks_with_preferred_locale_at_half_rate() {
        let voices = vec![Voice::new("Samantha", "en-US"), Voice::new("Lekha", "hi-IN")];
        let engine = RecordingEngine::new(voices.clone(), false);
        let player = player(engine.clone(), Arc::new(VoiceCatalog::with_voices(voices)));

        let playback = player.play("namaste (hello)", None).await.unwrap();
        assert_eq!(playback.audio_path, "cache/out.wav");
        assert_eq!(playback.voice.unwrap().name, "Lekha");

        let spoken = engine.spoken.lock().unwrap();
        assert_eq!(spoken[0].text, "namaste");
        assert_eq!(spoken[0].rate, 0.5);
    }

    #[tokio::test]
    async fn synthesis_leaves_the_character_idle() {
        let voices = vec![Voice::new("Samantha", "en-US")];
        let engine = RecordingEngine::new(voices.clone(), false);
        let player = player(engine.clone(), Arc::new(VoiceCatalog::with_voices(voices)));
        let mut rx = player.subscribe_character();

        let playback = player.play("hello", Some("hi-IN")).await.unwrap();
        assert_eq!(playback.voice.unwrap().name, "Samantha");
        assert_eq!(*engine.states_seen.lock().unwrap(), vec![CharacterState::Idle]);
        assert_eq!(player.character(), CharacterState::Idle);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn playback_events_drive_the_character() {
        let engine = RecordingEngine::new(Vec::new(), false);
        let player = player(engine, Arc::new(VoiceCatalog::new()));
        let mut rx = player.subscribe_character();

        player.playback_started("a");
        assert_eq!(*rx.borrow_and_update(), CharacterState::Speak);
        player.playback_started("a");
        assert!(!rx.has_changed().unwrap());

        player.playback_ended("a");
        assert_eq!(*rx.borrow_and_update(), CharacterState::Idle);
        player.playback_ended("a");
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn overlapping_sessions_keep_speaking_until_the_last_ends() {
        let engine = RecordingEngine::new(Vec::new(), false);
        let player = player(engine, Arc::new(VoiceCatalog::new()));

        player.playback_started("a");
        player.playback_started("b");
        player.playback_ended("a");
        assert_eq!(player.character(), CharacterState::Speak);

        player.release("b");
        assert_eq!(player.character(), CharacterState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn play_defers_until_voices_arrive() {
        let voices = vec![Voice::new("Lekha", "hi-IN")];
        let engine = RecordingEngine::new(voices, false);
        let player = Arc::new(player(engine.clone(), Arc::new(VoiceCatalog::new())));

        let pending = {
            let player = player.clone();
            tokio::spawn(async move { player.play("namaste", None).await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(engine.spoken.lock().unwrap().is_empty());

        assert_eq!(player.refresh_voices().await.unwrap(), 1);
        let playback = pending.await.unwrap().unwrap();
        assert_eq!(playback.voice.unwrap().name, "Lekha");
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_when_no_voices_load() {
        let engine = RecordingEngine::new(Vec::new(), false);
        let player = player(engine, Arc::new(VoiceCatalog::new()));
        assert!(matches!(player.play("hello", None).await, Err(SpeechError::NoVoices)));
    }
}

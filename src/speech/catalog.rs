use tokio::sync::watch;
use tracing::debug;

use super::voice::Voice;
use crate::error::SpeechError;

/// The voice list, which may be populated some time after startup.
///
/// Callers that need voices await [`VoiceCatalog::ready`], which resolves
/// on the first change that leaves the list non-empty.
pub struct VoiceCatalog {
    voices: watch::Sender<Vec<Voice>>,
}

impl VoiceCatalog {
    pub fn new() -> Self {
        let (voices, _) = watch::channel(Vec::new());
        Self { voices }
    }

    pub fn with_voices(voices: Vec<Voice>) -> Self {
        let catalog = Self::new();
        catalog.replace(voices);
        catalog
    }

    /// Replace the list and notify waiters. Returns the new voice count.
    pub fn replace(&self, voices: Vec<Voice>) -> usize {
        let count = voices.len();
        self.voices.send_replace(voices);
        debug!("Voice list changed: {} voices", count);
        count
    }

    pub fn voices(&self) -> Vec<Voice> {
        self.voices.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        !self.voices.borrow().is_empty()
    }

    pub async fn ready(&self) -> Result<Vec<Voice>, SpeechError> {
        let mut rx = self.voices.subscribe();
        let voices = rx
            .wait_for(|voices| !voices.is_empty())
            .await
            .map_err(|_| SpeechError::NoVoices)?;
        Ok(voices.clone())
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

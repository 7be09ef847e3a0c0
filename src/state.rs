use std::sync::Arc;
use dashmap::DashMap;
use tracing::{error, info};
use uuid::Uuid;

use crate::config_manager::Config;
use crate::error::IngestError;
use crate::ingest::LinkFetcher;
use crate::session::TranslationSession;
use crate::speech::{AudioPlayer, HttpSpeechEngine, SpeechEngine, VoiceCatalog};
use crate::storage::FavoriteStore;
use crate::translate::{Translator, TranslatorFactory};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub translator: Arc<dyn Translator>,
    pub sessions: Arc<DashMap<String, Arc<TranslationSession>>>,
    pub favorites: Arc<FavoriteStore>,
    pub player: Arc<AudioPlayer>,
    pub link_fetcher: LinkFetcher,
}

impl AppState {
    /// Build the state with the configured LLM provider and speech service.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let translator = TranslatorFactory::create_translator(&config.llm_config)?;
        let engine = Arc::new(HttpSpeechEngine::new(config.speech_config.tts_base_url.clone()));
        let favorites = FavoriteStore::open(config.storage_config.local_store_path())?;
        Ok(Self::with_services(config, translator, engine, favorites))
    }

    /// Build the state from the configuration installed at startup.
    pub fn from_installed() -> anyhow::Result<Self> {
        let config = Config::global()
            .ok_or_else(|| anyhow::anyhow!("Configuration has not been installed"))?;
        Self::new(config.clone())
    }

    pub fn with_services(
        config: Config,
        translator: Arc<dyn Translator>,
        engine: Arc<dyn SpeechEngine>,
        favorites: FavoriteStore,
    ) -> Self {
        let player = AudioPlayer::new(engine, Arc::new(VoiceCatalog::new()), &config.speech_config);
        Self {
            config: Arc::new(config),
            translator,
            sessions: Arc::new(DashMap::new()),
            favorites: Arc::new(favorites),
            player: Arc::new(player),
            link_fetcher: LinkFetcher::default(),
        }
    }

    pub fn generate_session_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    pub fn create_session(&self) -> Arc<TranslationSession> {
        let translation = &self.config.translation_config;
        let session = Arc::new(TranslationSession::new(
            self.generate_session_id(),
            self.translator.clone(),
            translation.default_language.clone(),
            translation.debounce(),
            translation.max_source_chars,
        ));
        self.sessions.insert(session.id(), session.clone());
        session
    }

    pub fn session(&self, id: &str) -> Option<Arc<TranslationSession>> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Forget a session, cancel its pending trigger and end any playback it
    /// left running.
    pub fn remove_session(&self, id: &str) -> bool {
        match self.sessions.remove(id) {
            Some((_, session)) => {
                session.cancel();
                self.player.release(id);
                info!("Removed session {}", id);
                true
            }
            None => false,
        }
    }

    /// Replace the session's source text with the content behind `link`.
    /// On failure the error is logged and the source text is left alone.
    pub async fn load_link(&self, session: &TranslationSession, link: &str) -> Result<(), IngestError> {
        match self.link_fetcher.fetch_text(link).await {
            Ok(text) => {
                session.set_source_text(text);
                Ok(())
            }
            Err(e) => {
                error!("Error fetching link content: {}", e);
                Err(e)
            }
        }
    }

    /// Load the voice list in the background; playback waits for it.
    pub fn spawn_voice_refresh(&self) {
        let player = self.player.clone();
        tokio::spawn(async move {
            match player.refresh_voices().await {
                Ok(count) => info!("Loaded {} voices", count),
                Err(e) => error!("Failed to load voices: {}", e),
            }
        });
    }
}

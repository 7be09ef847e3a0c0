use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::debounce::Debouncer;
use crate::error::StorageError;
use crate::storage::FavoriteStore;
use crate::translate::{TranslationRequest, Translator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Pending,
    Resolved,
}

/// What the presentation layer renders for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: String,
    pub source_text: String,
    pub selected_language: String,
    pub target_text: String,
    pub pronunciation_text: String,
    pub phonetic_pronunciation: String,
    pub status: SessionStatus,
    pub last_error: Option<String>,
    pub favorite: bool,
    pub source_length: usize,
    pub max_source_chars: usize,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    fn has_result(&self) -> bool {
        !self.target_text.is_empty()
    }
}

#[derive(Debug, Default)]
struct Progress {
    /// Sequence number of the latest dispatched request.
    issued: u64,
    /// Sequence number of the latest request whose reply was applied.
    settled: u64,
    awaiting_timer: bool,
}

struct Shared {
    translator: Arc<dyn Translator>,
    state: watch::Sender<SessionSnapshot>,
    progress: Mutex<Progress>,
}

impl Shared {
    fn progress(&self) -> std::sync::MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn dispatch(&self, request: TranslationRequest) {
        let seq = {
            let mut progress = self.progress();
            progress.awaiting_timer = false;
            progress.issued += 1;
            progress.issued
        };
        debug!("Dispatching translation #{} into {}", seq, request.target_language);

        let outcome = self.translator.translate(&request).await;

        let mut progress = self.progress();
        if seq != progress.issued {
            debug!("Discarding reply #{}, #{} is newer", seq, progress.issued);
            return;
        }
        progress.settled = seq;
        let status = if progress.awaiting_timer {
            SessionStatus::Pending
        } else {
            SessionStatus::Resolved
        };

        match outcome {
            Ok(result) => {
                self.state.send_modify(|s| {
                    s.target_text = result.translation;
                    s.pronunciation_text = result.pronunciation;
                    s.phonetic_pronunciation = result.phonetic_pronunciation;
                    s.last_error = None;
                    s.status = status;
                    s.resolved_at = Some(Utc::now());
                });
            }
            Err(e) => {
                error!("Error translating text: {}", e);
                self.state.send_modify(|s| {
                    s.last_error = Some(e.to_string());
                    s.status = status;
                });
            }
        }
    }
}

/// Reactive translation state for one client.
///
/// Every change of source text or language re-runs debounce, request and
/// parse. Only the reply to the most recently dispatched request is applied,
/// and a failed request leaves the previous result in place.
pub struct TranslationSession {
    shared: Arc<Shared>,
    debouncer: Debouncer,
}

impl TranslationSession {
    pub fn new(
        id: impl Into<String>,
        translator: Arc<dyn Translator>,
        language: impl Into<String>,
        debounce: Duration,
        max_source_chars: usize,
    ) -> Self {
        let snapshot = SessionSnapshot {
            id: id.into(),
            selected_language: language.into(),
            max_source_chars,
            ..SessionSnapshot::default()
        };
        info!("Created translation session {}", snapshot.id);
        let (state, _) = watch::channel(snapshot);

        Self {
            shared: Arc::new(Shared {
                translator,
                state,
                progress: Mutex::new(Progress::default()),
            }),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn id(&self) -> String {
        self.shared.state.borrow().id.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.state.subscribe()
    }

    pub fn set_source_text(&self, text: impl Into<String>) {
        self.set_input(Some(text.into()), None);
    }

    pub fn set_language(&self, language: impl Into<String>) {
        self.set_input(None, Some(language.into()));
    }

    /// Update either side of the input pair. Setting values equal to the
    /// current ones does nothing.
    pub fn set_input(&self, text: Option<String>, language: Option<String>) {
        let changed = self.shared.state.send_if_modified(|s| {
            let mut modified = false;
            if let Some(text) = text {
                if s.source_text != text {
                    s.source_length = text.chars().count();
                    s.source_text = text;
                    modified = true;
                }
            }
            if let Some(language) = language {
                if s.selected_language != language {
                    s.selected_language = language;
                    modified = true;
                }
            }
            modified
        });

        if changed {
            self.refresh();
        }
    }

    fn refresh(&self) {
        let (source_text, language) = {
            let s = self.shared.state.borrow();
            (s.source_text.clone(), s.selected_language.clone())
        };

        if source_text.trim().is_empty() {
            self.cancel();
            return;
        }

        self.shared.progress().awaiting_timer = true;
        self.shared.state.send_modify(|s| s.status = SessionStatus::Pending);

        let shared = self.shared.clone();
        let request = TranslationRequest::new(source_text, language);
        self.debouncer.schedule(async move {
            shared.dispatch(request).await;
        });
    }

    /// Drop any pending trigger. A request already sent still lands.
    pub fn cancel(&self) {
        self.debouncer.cancel();

        let mut progress = self.shared.progress();
        progress.awaiting_timer = false;
        if progress.issued == progress.settled {
            self.shared.state.send_if_modified(|s| {
                let status = if s.has_result() {
                    SessionStatus::Resolved
                } else {
                    SessionStatus::Idle
                };
                let modified = s.status != status;
                s.status = status;
                modified
            });
        }
    }

    /// Flip the favorite flag: on stores the current translation, off
    /// removes the stored one. The flag only changes once the store write
    /// succeeded, and concurrent toggles are serialized by the state lock.
    pub fn toggle_favorite(&self, store: &FavoriteStore) -> Result<bool, StorageError> {
        let mut outcome = Ok(false);
        self.shared.state.send_if_modified(|s| {
            let favorite = !s.favorite;
            let written = if favorite {
                store.save(&s.target_text)
            } else {
                store.clear()
            };
            match written {
                Ok(()) => {
                    s.favorite = favorite;
                    outcome = Ok(favorite);
                    true
                }
                Err(e) => {
                    outcome = Err(e);
                    false
                }
            }
        });
        outcome
    }
}

//! LinguaSpeak backend: debounced LLM translation with pronunciation
//! guides, favorites, and text-to-speech playback, served over REST and
//! WebSocket.

pub mod config_manager;
pub mod debounce;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod routes;
pub mod session;
pub mod speech;
pub mod state;
pub mod storage;
pub mod translate;
pub mod utils;
pub mod websocket;

pub use config_manager::Config;
pub use routes::build_app;
pub use session::{SessionSnapshot, SessionStatus, TranslationSession};
pub use state::AppState;

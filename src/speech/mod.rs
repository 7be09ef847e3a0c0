pub mod voice;
pub mod catalog;
pub mod preprocess;
pub mod engine;
pub mod player;

pub use voice::{select_voice, Voice};
pub use catalog::VoiceCatalog;
pub use preprocess::SpeechTextFilter;
pub use engine::{HttpSpeechEngine, SpeechEngine, Utterance};
pub use player::{AudioPlayer, CharacterState, Playback};

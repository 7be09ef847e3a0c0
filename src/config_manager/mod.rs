pub mod llm;
pub mod main;
pub mod speech;
pub mod storage;
pub mod system;
pub mod translation;
pub mod utils;

pub use llm::LlmConfig;
pub use main::Config;
pub use speech::{SpeechConfig, SpeechPreprocessorConfig};
pub use storage::StorageConfig;
pub use system::SystemConfig;
pub use translation::TranslationConfig;

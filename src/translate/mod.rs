pub mod interface;
pub mod prompt;
pub mod client;
pub mod factory;

pub use interface::{TranslationRequest, TranslationResult, Translator};
pub use client::OpenAICompatibleTranslator;
pub use factory::TranslatorFactory;

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::warn;

use crate::config_manager::llm::LlmConfig;
use crate::config_manager::speech::SpeechConfig;
use crate::config_manager::storage::StorageConfig;
use crate::config_manager::system::SystemConfig;
use crate::config_manager::translation::TranslationConfig;
use crate::config_manager::utils::{parse_config, read_config_text, ConfigFormat};

static GLOBAL_CONFIG: OnceLock<Config> = OnceLock::new();

/// Main configuration for the application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(default)]
    pub llm_config: LlmConfig,

    #[serde(default)]
    pub translation_config: TranslationConfig,

    #[serde(default)]
    pub speech_config: SpeechConfig,

    #[serde(default)]
    pub storage_config: StorageConfig,
}

impl Config {
    /// Load configuration from a JSON or YAML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = read_config_text(path)?;
        parse_config(&content, ConfigFormat::from_path(path))
    }

    /// Install as the process-wide configuration. The first call wins; the
    /// installed value is never replaced afterwards.
    pub fn install(self) -> &'static Config {
        if GLOBAL_CONFIG.get().is_some() {
            warn!("Configuration already installed, keeping the existing one");
        }
        GLOBAL_CONFIG.get_or_init(|| self)
    }

    pub fn global() -> Option<&'static Config> {
        GLOBAL_CONFIG.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn yaml_with_only_llm_section_gets_defaults() {
        let yaml = r#"
llm_config:
  llm_provider: groq_llm
  llm_api_key: gsk-test
  model: llama3-70b
"#;
        let config = parse_config(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.llm_config.llm_provider, "groq_llm");
        assert_eq!(config.llm_config.llm_api_key, "gsk-test");
        assert_eq!(config.llm_config.model, "llama3-70b");
        assert_eq!(config.translation_config.debounce_ms, 500);
        assert_eq!(config.translation_config.max_source_chars, 2000);
        assert_eq!(
            config.translation_config.languages,
            vec!["Sanskrit", "English", "Tamil"]
        );
        assert_eq!(config.translation_config.default_language, "sanskrit");
        assert_eq!(config.speech_config.speech_rate, 0.5);
        assert_eq!(config.speech_config.preferred_locale, "hi-IN");
        assert_eq!(
            config.storage_config.local_store_path,
            "data/local_storage.json"
        );
    }

    #[test]
    fn loads_json_file_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"llm_config": {{"model": "gpt-4o-mini"}}, "translation_config": {{"debounce_ms": 250}}}}"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.llm_config.model, "gpt-4o-mini");
        assert_eq!(config.llm_config.llm_provider, "openai_llm");
        assert_eq!(config.translation_config.debounce_ms, 250);
    }

    #[test]
    fn installed_config_is_the_global_one() {
        let installed = Config::default().install();
        let global = Config::global().unwrap();
        assert!(std::ptr::eq(installed, global));
    }

    #[test]
    fn environment_overrides_file_values() {
        std::env::set_var("LINGUASPEAK__SYSTEM_CONFIG__PORT", "9191");
        let config = parse_config("system_config:\n  port: 8000\n", ConfigFormat::Yaml).unwrap();
        std::env::remove_var("LINGUASPEAK__SYSTEM_CONFIG__PORT");
        assert_eq!(config.system_config.port, 9191);
    }
}

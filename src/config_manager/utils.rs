use std::path::Path;
use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::config_manager::main::Config;
use crate::utils::encoding::load_text_file_with_guess_encoding;

/// Environment prefix for overrides, e.g. `LINGUASPEAK__LLM_CONFIG__MODEL`.
pub const ENV_PREFIX: &str = "LINGUASPEAK";

/// On-disk format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &str) -> Self {
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") || path_lower.ends_with(".jsonld") {
            ConfigFormat::Json
        } else {
            ConfigFormat::Yaml
        }
    }

    fn file_format(self) -> config::FileFormat {
        match self {
            ConfigFormat::Json => config::FileFormat::Json,
            ConfigFormat::Yaml => config::FileFormat::Yaml,
        }
    }
}

/// Read a configuration file, guessing its encoding and substituting
/// `${VAR_NAME}` references from the environment.
pub fn read_config_text(config_path: &str) -> Result<String> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let content = load_text_file_with_guess_encoding(config_path)?;
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path);
    }

    substitute_env_vars(&content)
}

/// Replace `${VAR_NAME}` with the variable's value. Unset variables are left
/// as written.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

/// Layer the file content under environment overrides and deserialize.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<Config> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(content, format.file_format()))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    debug!("Parsed configuration: {:?}", config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_set_variables_and_keeps_unset_ones() {
        std::env::set_var("LINGUASPEAK_TEST_SUBST_KEY", "sk-123");
        let out = substitute_env_vars("key: ${LINGUASPEAK_TEST_SUBST_KEY}\nother: ${LINGUASPEAK_TEST_UNSET_VAR}")
            .unwrap();
        assert_eq!(out, "key: sk-123\nother: ${LINGUASPEAK_TEST_UNSET_VAR}");
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ConfigFormat::from_path("conf.json"), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path("CONF.JSONLD"), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path("conf.yaml"), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path("conf.yml"), ConfigFormat::Yaml);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_config_text("/definitely/not/here.yaml").is_err());
    }
}

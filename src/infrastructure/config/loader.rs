//! Configuration loading with hierarchical merging and load-time validation.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;
use crate::services::prompt;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_exchanges: {0}. Must be at least 1")]
    InvalidMaxExchanges(u32),

    #[error("Invalid history_window: {0}. Must be at least 1")]
    InvalidHistoryWindow(usize),

    #[error("Invalid early_conclusion_min_depth: {0}. Must be between 1 and 3")]
    InvalidEarlyConclusionDepth(u8),

    #[error("Invalid temperature for {role}: {value}. Must be between 0.0 and 2.0")]
    InvalidTemperature { role: String, value: f32 },

    #[error("Collection name cannot be empty: {0}")]
    EmptyCollectionName(String),

    #[error("Host and expert collections must be distinct")]
    CollectionsNotDisjoint,

    #[error("Invalid min_fragment_len: {0}. Must be at least 1")]
    InvalidMinFragmentLen(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Interview requires at least one topic")]
    NoTopics,

    #[error("Prompt template validation failed: {0}")]
    TemplateValidation(String),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `.socratic/config.yaml` (project config, created by init)
    /// 3. `.socratic/local.yaml` (local overrides, optional)
    /// 4. Environment variables (`SOCRATIC_*` prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".socratic/config.yaml"))
            .merge(Yaml::file(".socratic/local.yaml"))
            .merge(Env::prefixed("SOCRATIC_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading. Template placeholders are
    /// checked here so a broken template fails the run before the first
    /// prompt is ever formatted.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.interview.max_exchanges == 0 {
            return Err(ConfigError::InvalidMaxExchanges(
                config.interview.max_exchanges,
            ));
        }

        if config.interview.history_window == 0 {
            return Err(ConfigError::InvalidHistoryWindow(
                config.interview.history_window,
            ));
        }

        let depth = config.interview.early_conclusion_min_depth;
        if !(1..=3).contains(&depth) {
            return Err(ConfigError::InvalidEarlyConclusionDepth(depth));
        }

        if config.interview.topics.is_empty() {
            return Err(ConfigError::NoTopics);
        }

        for (role, profile) in [
            ("host", &config.generation.host),
            ("expert", &config.generation.expert),
            ("evaluator", &config.generation.evaluator),
        ] {
            if !(0.0..=2.0).contains(&profile.temperature) {
                return Err(ConfigError::InvalidTemperature {
                    role: role.to_string(),
                    value: profile.temperature,
                });
            }
        }

        if config.knowledge.host_collection.is_empty() {
            return Err(ConfigError::EmptyCollectionName("host".to_string()));
        }
        if config.knowledge.expert_collection.is_empty() {
            return Err(ConfigError::EmptyCollectionName("expert".to_string()));
        }
        if config.knowledge.host_collection == config.knowledge.expert_collection {
            return Err(ConfigError::CollectionsNotDisjoint);
        }

        if config.persona.min_fragment_len == 0 {
            return Err(ConfigError::InvalidMinFragmentLen(
                config.persona.min_fragment_len,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        prompt::validate_templates(&config.prompts)
            .map_err(|e| ConfigError::TemplateValidation(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        ConfigLoader::validate(&config).expect("default config should be valid");
    }

    #[test]
    fn yaml_overrides_parse_and_validate() {
        let yaml = r"
interview:
  max_exchanges: 8
  max_follow_ups: 1
generation:
  host:
    model: llama3:8b
    temperature: 0.9
logging:
  level: debug
  format: pretty
";
        let config: Config = serde_yaml::from_str(yaml).expect("yaml should parse");
        assert_eq!(config.interview.max_exchanges, 8);
        assert_eq!(config.generation.host.model, "llama3:8b");
        ConfigLoader::validate(&config).expect("overridden config should be valid");
    }

    #[test]
    fn zero_exchanges_rejected() {
        let mut config = Config::default();
        config.interview.max_exchanges = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxExchanges(0))
        ));
    }

    #[test]
    fn identical_collections_rejected() {
        let mut config = Config::default();
        config.knowledge.expert_collection = config.knowledge.host_collection.clone();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::CollectionsNotDisjoint)
        ));
    }

    #[test]
    fn out_of_range_temperature_rejected() {
        let mut config = Config::default();
        config.generation.evaluator.temperature = 3.5;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTemperature { .. })
        ));
    }

    #[test]
    fn broken_template_rejected_at_load_time() {
        let mut config = Config::default();
        config.prompts.evaluation = "no placeholders".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::TemplateValidation(_))
        ));
    }

    #[test]
    fn load_from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "interview:\n  max_exchanges: 4\n").unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.interview.max_exchanges, 4);
        // Untouched sections keep defaults.
        assert_eq!(config.knowledge.context_results, 3);
    }
}

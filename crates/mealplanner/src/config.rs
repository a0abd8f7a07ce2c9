//! Configuration management for mealplanner.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "mealplanner";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "mealplanner.db";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "MEALPLANNER_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `MEALPLANNER_`, sections split on `__`)
/// 2. TOML config file at `~/.config/mealplanner/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Meal suggestion configuration.
    pub suggestions: SuggestionConfig,
    /// Shopping list configuration.
    pub shopping: ShoppingConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/mealplanner/mealplanner.db`
    pub database_path: Option<PathBuf>,
}

/// Meal suggestion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Maximum number of suggestions returned per request.
    pub max_results: usize,
    /// Minimum number of protein-varied candidates required before the
    /// avoid-set is honoured; below this the whole eligible pool is used.
    pub min_preferred: usize,
    /// Fixed seed for the shuffle. Unset means a fresh seed per run.
    pub seed: Option<u64>,
}

/// Shopping list configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingConfig {
    /// Keep check marks for items that survive a shopping list rebuild.
    pub carry_checked: bool,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            min_preferred: 3,
            seed: None,
        }
    }
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            carry_checked: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.suggestions.max_results == 0 {
            return Err(Error::ConfigValidation {
                message: "suggestions.max_results must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.suggestions.max_results, 5);
        assert_eq!(config.suggestions.min_preferred, 3);
        assert!(config.suggestions.seed.is_none());
        assert!(config.shopping.carry_checked);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_max_results() {
        let mut config = Config::default();
        config.suggestions.max_results = 0;

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("max_results"));
    }

    #[test]
    fn test_min_preferred_zero_is_allowed() {
        let mut config = Config::default();
        config.suggestions.min_preferred = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("mealplanner.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/menu.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/menu.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("mealplanner"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        let path = Config::default_data_dir();
        assert!(path.to_string_lossy().contains("mealplanner"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "mealplanner_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[suggestions]\nmax_results = 8\nseed = 42\n\n[shopping]\ncarry_checked = false\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.suggestions.max_results, 8);
        assert_eq!(config.suggestions.seed, Some(42));
        assert_eq!(config.suggestions.min_preferred, 3);
        assert!(!config.shopping.carry_checked);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let path = std::env::temp_dir().join(format!(
            "mealplanner_config_invalid_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[suggestions]\nmax_results = 0\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_suggestion_config_deserialize() {
        let json = r#"{"max_results": 3}"#;
        let suggestions: SuggestionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(suggestions.max_results, 3);
        assert_eq!(suggestions.min_preferred, 3);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("max_results"));
        assert!(json.contains("carry_checked"));
    }
}

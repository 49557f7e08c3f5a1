//! Configuration for the saved search store
//!
//! Values come from the environment (optionally seeded from a `.env` file),
//! falling back to the defaults below.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

use crate::data::{CoreError, Visibility};

pub const SAVED_SEARCH_VISIBILITY_VAR: &str = "SAVED_SEARCH_VISIBILITY";
pub const USER_VISIBILITY_VAR: &str = "USER_VISIBILITY";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStoreConfig {
    /// Visibility every saved search property and ownership edge is written at
    #[serde(default = "default_visibility")]
    pub visibility: String,

    /// Visibility of user vertices, requested alongside `visibility` when
    /// resolving a user's authorizations
    #[serde(default = "default_user_visibility")]
    pub user_visibility: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_visibility() -> String {
    "search".to_string()
}

fn default_user_visibility() -> String {
    "user".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SearchStoreConfig {
    fn default() -> Self {
        Self {
            visibility: default_visibility(),
            user_visibility: default_user_visibility(),
            log_level: default_log_level(),
        }
    }
}

impl SearchStoreConfig {
    /// Load configuration from a `.env` file and environment variables
    pub fn load() -> Result<Self, CoreError> {
        dotenv::dotenv().ok();
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment
    pub fn load_from<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(visibility) = lookup(SAVED_SEARCH_VISIBILITY_VAR) {
            config.visibility = visibility;
        }

        if let Some(user_visibility) = lookup(USER_VISIBILITY_VAR) {
            config.user_visibility = user_visibility;
        }

        if let Some(log_level) = lookup(LOG_LEVEL_VAR) {
            config.log_level = log_level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects label expressions that cannot be parsed
    pub fn validate(&self) -> Result<(), CoreError> {
        let visibility = Visibility::parse(&self.visibility).map_err(|e| {
            CoreError::ConfigError(format!("Invalid {}: {}", SAVED_SEARCH_VISIBILITY_VAR, e))
        })?;
        Visibility::parse(&self.user_visibility).map_err(|e| {
            CoreError::ConfigError(format!("Invalid {}: {}", USER_VISIBILITY_VAR, e))
        })?;

        if visibility.is_public() {
            warn!("{} is empty - saved searches will be readable by every caller!", SAVED_SEARCH_VISIBILITY_VAR);
        }

        Ok(())
    }

    /// The parsed saved search visibility
    pub fn search_visibility(&self) -> Result<Visibility, CoreError> {
        Visibility::parse(&self.visibility)
            .map_err(|e| CoreError::ConfigError(format!("Invalid {}: {}", SAVED_SEARCH_VISIBILITY_VAR, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = SearchStoreConfig::load_from(|_| None).unwrap();
        assert_eq!(config, SearchStoreConfig::default());
        assert_eq!(config.visibility, "search");
        assert_eq!(config.user_visibility, "user");
    }

    #[test]
    fn test_environment_overrides() {
        let config = SearchStoreConfig::load_from(lookup_from(&[
            (SAVED_SEARCH_VISIBILITY_VAR, "tenant-a&search"),
            (LOG_LEVEL_VAR, "debug"),
        ]))
        .unwrap();

        assert_eq!(config.visibility, "tenant-a&search");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.search_visibility().unwrap().as_str(), "tenant-a&search");
    }

    #[test]
    fn test_invalid_visibility_is_config_error() {
        let result = SearchStoreConfig::load_from(lookup_from(&[(SAVED_SEARCH_VISIBILITY_VAR, "&")]));
        assert!(matches!(result, Err(CoreError::ConfigError(_))));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: SearchStoreConfig = serde_json::from_str(r#"{"visibility":"private"}"#).unwrap();
        assert_eq!(config.visibility, "private");
        assert_eq!(config.user_visibility, "user");
        assert_eq!(config.log_level, "info");
    }
}

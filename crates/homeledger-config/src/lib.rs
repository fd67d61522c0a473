//! Configuration management for homeledger
//!
//! This module handles loading, validation, and management of
//! homeledger configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8084
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding one JSON file per collection
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

/// A single household member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberConfig {
    /// Stable identifier used in owner fields and filters
    pub id: String,
    /// Display name
    pub name: String,
}

/// Household configuration: the enumerable set of participants.
///
/// Owner filters accept `all`, `joint`, or one of these member ids; nothing
/// else in the system hard-codes member names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdConfig {
    #[serde(default = "default_members")]
    pub members: Vec<MemberConfig>,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            members: default_members(),
        }
    }
}

fn default_members() -> Vec<MemberConfig> {
    vec![
        MemberConfig {
            id: "m1".to_string(),
            name: "Member One".to_string(),
        },
        MemberConfig {
            id: "m2".to_string(),
            name: "Member Two".to_string(),
        },
    ]
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records per page for lists
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            records_per_page: default_records_per_page(),
        }
    }
}

fn default_records_per_page() -> usize {
    50
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,
    /// Household members
    #[serde(default)]
    pub household: HouseholdConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().into_owned(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::IoError)?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::InvalidYaml {
                message: e.to_string(),
            })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.household.members.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "household.members".to_string(),
                reason: "At least one household member is required".to_string(),
            });
        }

        for (i, member) in self.household.members.iter().enumerate() {
            if member.id.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("household.members[{}].id", i),
                    reason: "Member id must not be empty".to_string(),
                });
            }
            if member.id == "all" || member.id == "joint" {
                return Err(ConfigError::InvalidValue {
                    field: format!("household.members[{}].id", i),
                    reason: "Member id must not shadow the reserved filters 'all' or 'joint'"
                        .to_string(),
                });
            }
        }

        let mut ids: Vec<&str> = self
            .household
            .members
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        ids.sort();
        ids.dedup();
        if ids.len() != self.household.members.len() {
            return Err(ConfigError::InvalidValue {
                field: "household.members".to_string(),
                reason: "Member ids must be unique".to_string(),
            });
        }

        if self.pagination.records_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.records_per_page".to_string(),
                reason: "Records per page must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Check whether the given id names a configured household member
    pub fn is_member(&self, id: &str) -> bool {
        self.household.members.iter().any(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.household.members.len(), 2);
        assert_eq!(config.pagination.records_per_page, 50);
    }

    #[test]
    fn rejects_duplicate_member_ids() {
        let mut config = Config::default();
        config.household.members[1].id = config.household.members[0].id.clone();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_reserved_member_ids() {
        let mut config = Config::default();
        config.household.members[0].id = "all".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }
}

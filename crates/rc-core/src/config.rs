//! Configuration types and parsing for relcheck.yml

use crate::error::{CoreError, CoreResult};
use crate::relation::{Policy, RelationDefaults};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

/// Environment variable consulted when no `--target` flag is given
pub const TARGET_ENV_VAR: &str = "RC_TARGET";

/// Main configuration from relcheck.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Quote policy override applied on top of the adapter's defaults
    #[serde(default)]
    pub quoting: Option<Policy>,

    /// Variables available to test fixtures
    #[serde(default)]
    pub vars: HashMap<String, serde_yaml::Value>,

    /// Named target configurations (e.g., dev, ci)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Variable overrides (merged with base vars)
    #[serde(default)]
    pub vars: HashMap<String, serde_yaml::Value>,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file path or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Default database part of relations.
    ///
    /// When unset, the adapter fills in the catalog name of the opened
    /// database.
    #[serde(default)]
    pub name: Option<String>,

    /// Default schema for unqualified relation names
    #[serde(default)]
    pub schema: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
            name: None,
            schema: None,
        }
    }
}

impl DatabaseConfig {
    /// In-memory database with default settings
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Defaults applied to the missing leftmost parts of relation names
    pub fn relation_defaults(&self) -> RelationDefaults {
        RelationDefaults {
            database: self.name.clone(),
            schema: self.schema.clone(),
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "database.name cannot be empty when set".to_string(),
            });
        }
        if self.schema.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "database.schema cannot be empty when set".to_string(),
            });
        }
        Ok(())
    }
}

const DEFAULT_DB_PATH: &str = ":memory:";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::parse(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for relcheck.yml or relcheck.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("relcheck.yml");
        let yaml_path = dir.join("relcheck.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn parse(content: &str) -> CoreResult<Self> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CoreResult<()> {
        self.database.validate()?;
        for (name, target) in &self.targets {
            if let Some(db) = &target.database {
                db.validate().map_err(|e| CoreError::ConfigInvalid {
                    message: format!("target '{}': {}", name, e),
                })?;
            }
        }
        Ok(())
    }

    /// Get database configuration, optionally applying target overrides
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => {
                let target_config =
                    self.targets
                        .get(name)
                        .ok_or_else(|| CoreError::ConfigInvalid {
                            message: format!(
                                "Target '{}' not found. Available targets: {}",
                                name,
                                self.available_targets().join(", ")
                            ),
                        })?;

                Ok(target_config
                    .database
                    .clone()
                    .unwrap_or_else(|| self.database.clone()))
            }
            None => Ok(self.database.clone()),
        }
    }

    /// Get merged variables, with target overrides taking precedence.
    pub fn get_merged_vars(
        &self,
        target: Option<&str>,
    ) -> Cow<'_, HashMap<String, serde_yaml::Value>> {
        let target_config = target.and_then(|name| self.targets.get(name));
        match target_config.filter(|tc| !tc.vars.is_empty()) {
            Some(tc) => {
                let mut vars = self.vars.clone();
                for (key, value) in &tc.vars {
                    vars.insert(key.clone(), value.clone());
                }
                Cow::Owned(vars)
            }
            None => Cow::Borrowed(&self.vars),
        }
    }

    /// Look up a string variable, with target overrides applied
    pub fn get_var_str(&self, target: Option<&str>, key: &str) -> Option<String> {
        self.get_merged_vars(target)
            .get(key)
            .and_then(|v| v.as_str())
            .map(String::from)
    }

    fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Resolve target from CLI flag or RC_TARGET environment variable
    ///
    /// Priority: CLI flag > RC_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Configuration types and parsing for askql.yml

use crate::error::{CoreError, CoreResult};
use crate::relationships::RelationshipMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Config file names looked up in a directory, in priority order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["askql.yml", "askql.yaml"];

/// Environment variable consulted for the target when no flag is given
pub const TARGET_ENV_VAR: &str = "ASKQL_TARGET";

/// Main configuration from askql.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Words and phrases the intent extractor recognizes
    #[serde(default)]
    pub vocabulary: VocabularyConfig,

    /// Join map for the relationship resolver
    #[serde(default = "RelationshipMap::enrollment_defaults")]
    pub relationships: RelationshipMap,

    /// HTTP API settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Named target configurations (e.g., dev, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            vocabulary: VocabularyConfig::default(),
            relationships: RelationshipMap::enrollment_defaults(),
            server: ServerConfig::default(),
            targets: HashMap::new(),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Schema whose tables are introspected and queried
    #[serde(default = "default_db_schema")]
    pub schema: String,

    /// SQL batches executed once when the connection opens
    #[serde(default)]
    pub on_start: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            schema: default_db_schema(),
            on_start: Vec::new(),
        }
    }
}

/// Vocabulary for question normalization and intent extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VocabularyConfig {
    /// Known city values, in match priority order and display casing
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,

    /// Phrases that turn a question into a COUNT(*) query
    #[serde(default = "default_count_phrases")]
    pub count_phrases: Vec<String>,

    /// Whole-word typo corrections (misspelling → replacement), applied in
    /// key order
    #[serde(default = "default_typos")]
    pub typos: BTreeMap<String, String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            cities: default_cities(),
            count_phrases: default_count_phrases(),
            typos: default_typos(),
        }
    }
}

/// HTTP API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

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

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

fn default_db_schema() -> String {
    "main".to_string()
}

fn default_cities() -> Vec<String> {
    ["Bangalore", "Delhi", "Chennai"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_count_phrases() -> Vec<String> {
    ["count", "how many", "how much", "number of", "total"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_typos() -> BTreeMap<String, String> {
    BTreeMap::from([("mny".to_string(), "many".to_string())])
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
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
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory.
    ///
    /// Looks for askql.yml or askql.yaml; falls back to defaults when
    /// neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => {
                log::debug!(
                    "No config file in {}, using defaults",
                    dir.display()
                );
                Ok(Self::default())
            }
        }
    }

    /// First existing config file in `dir`
    pub fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        validate_database(&self.database, "database")?;
        for (name, target) in &self.targets {
            if let Some(db) = &target.database {
                validate_database(db, &format!("targets.{name}.database"))?;
            }
        }

        if self.vocabulary.cities.iter().any(|c| c.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "vocabulary.cities must not contain empty names".to_string(),
            });
        }
        if self
            .vocabulary
            .count_phrases
            .iter()
            .any(|p| p.trim().is_empty())
        {
            return Err(CoreError::ConfigInvalid {
                message: "vocabulary.count_phrases must not contain empty phrases".to_string(),
            });
        }
        if let Some((typo, _)) = self
            .vocabulary
            .typos
            .iter()
            .find(|(k, v)| k.trim().is_empty() || v.trim().is_empty())
        {
            return Err(CoreError::ConfigInvalid {
                message: format!("vocabulary.typos entry '{typo}' must not be empty"),
            });
        }

        for (hub, peers) in self.relationships.iter() {
            if peers.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("relationships.{hub} has no peer tables"),
                });
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

    /// Target names in sorted order
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Resolve target from CLI flag or ASKQL_TARGET environment variable
    ///
    /// Priority: CLI flag > ASKQL_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
            .filter(|t| !t.is_empty())
    }
}

fn validate_database(db: &DatabaseConfig, field: &str) -> CoreResult<()> {
    if db.path.trim().is_empty() {
        return Err(CoreError::ConfigInvalid {
            message: format!("{field}.path cannot be empty"),
        });
    }
    if db.schema.trim().is_empty() {
        return Err(CoreError::ConfigInvalid {
            message: format!("{field}.schema cannot be empty"),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

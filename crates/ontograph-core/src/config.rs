//! Configuration management for ontograph.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`ONTOGRAPH__` prefix, `__` separator, e.g. `ONTOGRAPH__NEO4J__URI`)
//! 2. Config file (`ontograph.toml` by default, optional)
//! 3. Defaults

use serde::Deserialize;

use crate::error::OntographError;

pub const ENV_PREFIX: &str = "ONTOGRAPH";
pub const DEFAULT_FILE_PREFIX: &str = "ontograph";

/// Top-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub neo4j: Neo4jSettings,

    #[serde(default)]
    pub ontology: OntologySettings,
}

/// Connection settings for the graph store.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Database name; the server default is used when unset.
    #[serde(default)]
    pub database: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

/// Behaviour switches for the ontology layer.
#[derive(Debug, Clone, Deserialize)]
pub struct OntologySettings {
    /// Reject object attributes that the class signature does not declare.
    #[serde(default = "default_true")]
    pub strict_attributes: bool,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "password".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_true() -> bool {
    true
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            database: None,
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl Default for OntologySettings {
    fn default() -> Self {
        Self {
            strict_attributes: default_true(),
        }
    }
}

impl Settings {
    /// Load settings from `<file_prefix>.toml` (if present) and the environment.
    pub fn load(file_prefix: &str) -> Result<Self, OntographError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;
        tracing::debug!(uri = %settings.neo4j.uri, "Loaded settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), OntographError> {
        if self.neo4j.uri.trim().is_empty() {
            return Err(OntographError::InvalidSetting {
                field: "neo4j.uri",
                reason: "must not be empty".to_string(),
            });
        }
        if self.neo4j.max_connections == 0 {
            return Err(OntographError::InvalidSetting {
                field: "neo4j.max_connections",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.neo4j.fetch_size == 0 {
            return Err(OntographError::InvalidSetting {
                field: "neo4j.fetch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

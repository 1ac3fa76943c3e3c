use thiserror::Error;

/// Top-level error type shared by ontograph components.
#[derive(Error, Debug)]
pub enum OntographError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}

impl From<config::ConfigError> for OntographError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

//! Error types for the ontograph CLI.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Ontology error: {0}")]
    Ontology(#[from] ontograph_ontology::OntologyError),

    #[error("Graph error: {0}")]
    Graph(#[from] ontograph_graph::GraphError),

    #[error("Config error: {0}")]
    Config(#[from] ontograph_core::OntographError),

    #[error("{kind} not found: {uri}")]
    NotFound { kind: &'static str, uri: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Refusing to {0} without --yes")]
    NotConfirmed(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

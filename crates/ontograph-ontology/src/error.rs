//! Error types for the ontograph-ontology crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OntologyError {
    #[error("Graph error: {0}")]
    Graph(#[from] ontograph_graph::GraphError),

    #[error("Class not found: {uri}")]
    ClassNotFound { uri: String },

    #[error("Attribute key {key} is a reserved relationship name")]
    ReservedAttribute { key: String },

    #[error("Attribute {key} is not declared on class {class_uri}")]
    UndeclaredAttribute { class_uri: String, key: String },

    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),
}

pub type Result<T> = std::result::Result<T, OntologyError>;

//! ontograph-core: shared types, configuration, and error handling for ontograph.
//!
//! This crate provides the foundational types used across all ontograph components:
//! - Generic graph shapes (`Node`, `Arc`) returned by the repositories
//! - The ontology vocabulary (`NodeKind`, `Relation`) and class `Signature`
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{Neo4jSettings, OntologySettings, Settings};
pub use error::OntographError;
pub use types::{
    Arc, Direction, Node, NodeKind, ObjectAttribute, Properties, Relation, Signature,
    SignatureObjParam, SignatureParam,
};

//! ontograph-cli: operator tool for an ontograph ontology.
//!
//! Loads settings, connects to Neo4j, and maps each subcommand onto the
//! ontology repository, printing results as JSON.

pub mod cli;
pub mod commands;
pub mod demo;
pub mod error;

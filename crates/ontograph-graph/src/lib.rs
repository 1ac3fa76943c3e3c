//! ontograph-graph: generic property-graph repository over Neo4j.
//!
//! All graph reads and writes flow through [`GraphRepository`], which talks
//! to the store only via the [`QueryExecutor`] boundary. Dynamic values are
//! always bound as parameters; labels and relationship types, which Cypher
//! cannot bind, go through [`labels`] before reaching query text.

pub mod client;
pub mod executor;
pub mod identity;
pub mod labels;
pub mod mutations;
pub mod queries;
pub mod repository;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use executor::{CypherQuery, QueryExecutor, Record};
pub use repository::{GraphRepository, DEFAULT_ARC_TYPE};

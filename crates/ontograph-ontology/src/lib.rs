//! ontograph-ontology: classes, attributes, and instances stored as graph
//! structures.
//!
//! The ontology has no schema store of its own. A class is a `Class` node,
//! its hierarchy is `subclass_of` arcs, attribute declarations are
//! `DatatypeProperty`/`ObjectProperty` nodes attached with `applies_to`, and
//! an object's attribute values are `Property` nodes reached through arcs
//! whose type is the attribute key.

pub mod attributes;
pub mod classes;
pub mod error;
pub mod objects;
pub mod repository;
pub mod signature;

pub use error::{OntologyError, Result};
pub use repository::OntologyRepository;

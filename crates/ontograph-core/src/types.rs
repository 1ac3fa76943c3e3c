//! Core domain types for the ontograph property graph.
//!
//! Every persisted entity is either a node or a directed, typed arc in one
//! shared graph space. Ontology concepts (classes, attributes, instances) are
//! distinguished by node label, which this module models as [`NodeKind`].

use serde::{Deserialize, Serialize};

/// Free-form property map as written to, and read from, the graph store.
pub type Properties = serde_json::Map<String, serde_json::Value>;

// ── Generic graph shapes ──────────────────────────────────────────

/// A graph vertex as exposed to callers.
///
/// `id` is the store's element id: opaque, not stable across compaction, and
/// only meant for debugging. `uri` is the stable external identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub uri: String,
    pub title: String,
    pub description: String,
    /// Ontology kind derived from the node's labels, if it carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    /// Outgoing arcs, populated only by reads that ask for them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arcs: Option<Vec<Arc>>,
}

/// A directed, typed relationship between two nodes.
///
/// `uri` holds the relationship type, which doubles as its semantic name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Arc {
    pub id: String,
    pub uri: String,
    pub from_uri: String,
    pub to_uri: String,
}

// ── Ontology vocabulary ───────────────────────────────────────────

/// The closed set of ontology node kinds. Store labels are only the
/// serialization of this enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Class,
    Object,
    DatatypeProperty,
    ObjectProperty,
    Property,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Class,
        NodeKind::Object,
        NodeKind::DatatypeProperty,
        NodeKind::ObjectProperty,
        NodeKind::Property,
    ];

    /// The store label for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::Object => "Object",
            Self::DatatypeProperty => "DatatypeProperty",
            Self::ObjectProperty => "ObjectProperty",
            Self::Property => "Property",
        }
    }

    /// Prefix used when generating uris for nodes of this kind.
    pub fn uri_prefix(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Object => "obj",
            Self::DatatypeProperty => "attr",
            Self::ObjectProperty => "obj_attr",
            Self::Property => "prop",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    /// First recognised kind among a node's labels.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Option<Self> {
        labels.iter().find_map(|l| Self::from_label(l.as_ref()))
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Relationship types with fixed meaning in the ontology. Object attribute
/// keys may never use these names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Child class → parent class.
    SubclassOf,
    /// Object → its class.
    InstanceOf,
    /// Attribute declaration → owning (domain) class.
    AppliesTo,
    /// Object attribute declaration → range class.
    PointsTo,
}

impl Relation {
    pub const ALL: [Relation; 4] = [
        Relation::SubclassOf,
        Relation::InstanceOf,
        Relation::AppliesTo,
        Relation::PointsTo,
    ];

    /// The relationship type string stored in the graph.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubclassOf => "subclass_of",
            Self::InstanceOf => "instance_of",
            Self::AppliesTo => "applies_to",
            Self::PointsTo => "points_to",
        }
    }

    pub fn is_reserved(name: &str) -> bool {
        Self::ALL.iter().any(|r| r.as_str() == name)
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Signature ─────────────────────────────────────────────────────

/// A scalar attribute declared directly on a class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignatureParam {
    pub title: String,
    pub uri: String,
}

/// Which way an object attribute points relative to the owning object.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Outgoing,
    Incoming,
}

/// A relational attribute declared directly on a class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignatureObjParam {
    pub title: String,
    pub uri: String,
    pub target_class_uri: String,
    #[serde(default)]
    pub direction: Direction,
}

/// Attributes declared directly on a class (one hop of `applies_to`, not
/// inherited from ancestors).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<SignatureParam>,
    pub obj_params: Vec<SignatureObjParam>,
}

impl Signature {
    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.obj_params.is_empty()
    }

    /// Whether `key` names a declared attribute, by title or by uri.
    pub fn declares(&self, key: &str) -> bool {
        self.params.iter().any(|p| p.title == key || p.uri == key)
            || self.obj_params.iter().any(|p| p.title == key || p.uri == key)
    }
}

/// One stored attribute value of an object: the arc type and the value node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectAttribute {
    pub key: String,
    pub value: String,
    pub uri: String,
}

//! Class instances and their attribute values.
//!
//! An object is an `Object` node with an `instance_of` arc to its class. Each
//! attribute value is a `Property` node holding the stringified value,
//! reached from the object by an arc whose type is the attribute key.

use serde_json::{json, Value};

use ontograph_core::{Node, NodeKind, ObjectAttribute, Properties, Relation};
use ontograph_graph::repository::{
    create_arc_statement, create_node_statement, update_node_statement,
};
use ontograph_graph::{identity, CypherQuery, GraphError, QueryExecutor};

use crate::error::{OntologyError, Result};
use crate::repository::{node_props, OntologyRepository};

/// Keys stored on the object node itself rather than as value nodes.
const NODE_FIELDS: [&str; 2] = ["title", "description"];

impl<E: QueryExecutor> OntologyRepository<E> {
    // ── Lookups ──────────────────────────────────────────────────

    pub async fn get_object(&self, object_uri: &str) -> Result<Option<Node>> {
        self.node_matching("MATCH (o:Object {uri: $uri})", "o", object_uri)
            .await
    }

    /// The class an object is an instance of.
    pub async fn get_object_class(&self, object_uri: &str) -> Result<Option<Node>> {
        self.node_matching(
            "MATCH (:Object {uri: $uri})-[:instance_of]->(c:Class)",
            "c",
            object_uri,
        )
        .await
    }

    /// Stored attribute values of an object, ordered by key.
    pub async fn get_object_properties(&self, object_uri: &str) -> Result<Vec<ObjectAttribute>> {
        let q = CypherQuery::new(
            "MATCH (:Object {uri: $uri})-[r]->(value:Property)
             RETURN type(r) AS key, value.value AS value, value.uri AS uri
             ORDER BY key, uri",
        )
        .param("uri", object_uri);

        let rows = self.graph().execute(q).await?;
        Ok(rows
            .iter()
            .map(|r| ObjectAttribute {
                key: r.get_string("key"),
                value: r.get_string("value"),
                uri: r.get_string("uri"),
            })
            .collect())
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Create an instance of `class_uri`.
    ///
    /// `title` and `description` go on the object node; every other non-null
    /// entry becomes a value node. The object, its `instance_of` arc, and all
    /// value nodes are written in one transaction.
    pub async fn create_object(&self, class_uri: &str, data: &Properties) -> Result<Node> {
        self.require_class(class_uri).await?;
        let attributes = self.validate_attributes(Some(class_uri), data).await?;

        let object_uri = identity::generate_uri(NodeKind::Object.uri_prefix());
        let (create, _) = create_node_statement(node_props(
            NodeKind::Object,
            &object_uri,
            &node_field(data, "title"),
            &node_field(data, "description"),
        ))?;
        let mut statements = vec![
            create,
            create_arc_statement(
                &object_uri,
                class_uri,
                Relation::InstanceOf.as_str(),
                Properties::new(),
            )?,
        ];
        statements.extend(value_statements(&object_uri, &attributes)?);

        let object = self.run_composite(statements).await?;
        tracing::info!(
            %class_uri,
            object_uri = %object.uri,
            attributes = attributes.len(),
            "Created object"
        );
        Ok(object)
    }

    /// Replace an object's title, description, and full attribute set.
    ///
    /// Unlike a node update this is not a merge: value nodes for keys absent
    /// from `data` are removed. Returns `None` if the object does not exist.
    pub async fn update_object(&self, object_uri: &str, data: &Properties) -> Result<Option<Node>> {
        if self.get_object(object_uri).await?.is_none() {
            return Ok(None);
        }
        let class = self.get_object_class(object_uri).await?;
        let attributes = self
            .validate_attributes(class.as_ref().map(|c| c.uri.as_str()), data)
            .await?;

        let mut fields = Properties::new();
        for key in NODE_FIELDS {
            fields.insert(key.to_string(), json!(node_field(data, key)));
        }
        let mut statements = vec![
            update_node_statement(object_uri, fields).required("update_object"),
            CypherQuery::new(
                "MATCH (:Object {uri: $uri})-->(value:Property)
                 DETACH DELETE value",
            )
            .param("uri", object_uri),
        ];
        statements.extend(value_statements(object_uri, &attributes)?);

        let object = self.run_composite(statements).await?;
        tracing::info!(%object_uri, attributes = attributes.len(), "Updated object");
        Ok(Some(object))
    }

    /// Remove an object together with its value nodes.
    pub async fn delete_object(&self, object_uri: &str) -> Result<bool> {
        let q = CypherQuery::new(
            "MATCH (o:Object {uri: $uri})
             OPTIONAL MATCH (o)-->(value:Property)
             WITH o, collect(DISTINCT value) AS values
             UNWIND [o] + values AS doomed
             WITH DISTINCT doomed
             DETACH DELETE doomed
             RETURN count(doomed) AS deleted",
        )
        .param("uri", object_uri);

        let deleted = self.deleted_count(q).await?;
        if deleted {
            tracing::info!(%object_uri, "Deleted object");
        }
        Ok(deleted)
    }

    // ── Validation ───────────────────────────────────────────────

    /// Check attribute keys and stringify their values.
    ///
    /// Empty and reserved keys are always rejected. In strict mode every key
    /// must be declared in the class signature; an object without a class
    /// only gets the unconditional checks.
    async fn validate_attributes(
        &self,
        class_uri: Option<&str>,
        data: &Properties,
    ) -> Result<Vec<(String, String)>> {
        let mut attributes = Vec::new();
        for (key, value) in data {
            if NODE_FIELDS.contains(&key.as_str()) {
                continue;
            }
            let Some(text) = stringify(value) else {
                continue;
            };
            if key.is_empty() {
                return Err(OntologyError::InvalidAttribute(
                    "attribute key must not be empty".to_string(),
                ));
            }
            if Relation::is_reserved(key) {
                return Err(OntologyError::ReservedAttribute { key: key.clone() });
            }
            attributes.push((key.clone(), text));
        }

        let strict = self.strict_attributes() && !attributes.is_empty();
        if let Some(class_uri) = class_uri.filter(|_| strict) {
            let signature = self.collect_signature(class_uri).await?;
            if let Some((key, _)) = attributes.iter().find(|(key, _)| !signature.declares(key)) {
                return Err(OntologyError::UndeclaredAttribute {
                    class_uri: class_uri.to_string(),
                    key: key.clone(),
                });
            }
        }
        Ok(attributes)
    }
}

/// Value node plus keyed arc for each attribute.
fn value_statements(
    object_uri: &str,
    attributes: &[(String, String)],
) -> std::result::Result<Vec<CypherQuery>, GraphError> {
    let mut statements = Vec::with_capacity(attributes.len() * 2);
    for (key, value) in attributes {
        let value_uri = identity::generate_uri(NodeKind::Property.uri_prefix());
        let mut props = Properties::new();
        props.insert("uri".to_string(), json!(value_uri));
        props.insert("value".to_string(), json!(value));
        props.insert("labels".to_string(), json!([NodeKind::Property.label()]));

        let (create, _) = create_node_statement(props)?;
        statements.push(create);
        statements.push(create_arc_statement(object_uri, &value_uri, key, Properties::new())?);
    }
    Ok(statements)
}

/// Strings verbatim, other values as JSON text, null as absent.
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn node_field(data: &Properties, key: &str) -> String {
    data.get(key).and_then(stringify).unwrap_or_default()
}

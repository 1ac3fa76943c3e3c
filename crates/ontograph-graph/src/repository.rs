//! The generic property-graph repository and its shared statement builders.
//!
//! Reads live in [`crate::queries`], writes in [`crate::mutations`]. The
//! builders here are public so composite callers can batch several writes
//! into one [`QueryExecutor::execute_atomic`] call.

use chrono::Utc;
use serde_json::Value;

use ontograph_core::{Arc, Node, NodeKind, Properties};

use crate::client::{GraphClient, GraphConfig, GraphError};
use crate::executor::{CypherQuery, QueryExecutor, Record};
use crate::identity;
use crate::labels::{escape_identifier, escape_labels};

/// Relationship type used by `create_arc` when the caller gives none.
pub const DEFAULT_ARC_TYPE: &str = "RELATES_TO";

/// Uri prefix for nodes created without an explicit uri.
pub const DEFAULT_URI_PREFIX: &str = "node";

/// Generic CRUD over nodes and arcs, keyed by `uri`.
///
/// The repository owns its executor. Call [`GraphRepository::close`] when the
/// scope ends; the executor is released exactly once, and dropping the
/// repository without closing releases it as well.
pub struct GraphRepository<E = GraphClient> {
    executor: E,
}

impl GraphRepository<GraphClient> {
    /// Connect to Neo4j and wrap the client in a repository.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        Ok(Self::new(GraphClient::connect(config).await?))
    }
}

impl<E: QueryExecutor> GraphRepository<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Release the underlying connection pool.
    pub fn close(self) {
        tracing::debug!("Graph repository closed");
        drop(self.executor);
    }

    /// Run arbitrary Cypher with bound parameters.
    pub async fn run_custom_query(
        &self,
        cypher: &str,
        params: Properties,
    ) -> Result<Vec<Record>, GraphError> {
        self.execute(CypherQuery::new(cypher).params(params)).await
    }

    pub async fn execute(&self, query: CypherQuery) -> Result<Vec<Record>, GraphError> {
        self.executor.execute(query).await
    }

    pub async fn execute_atomic(
        &self,
        queries: Vec<CypherQuery>,
    ) -> Result<Vec<Vec<Record>>, GraphError> {
        self.executor.execute_atomic(queries).await
    }
}

// ── Statement builders ───────────────────────────────────────────

/// Cypher projection of a node variable into the columns read by
/// [`collect_node`].
pub fn node_projection(var: &str) -> String {
    format!(
        "elementId({var}) AS element_id, labels({var}) AS labels, {var}.uri AS uri, \
         {var}.title AS title, {var}.description AS description"
    )
}

/// Build the guarded CREATE for a node.
///
/// A `labels` entry in `properties` (array of strings) becomes the node's
/// labels and is never stored as a property. A missing `uri` is generated
/// with the `node_` prefix. The statement yields no row if another node
/// already holds the uri. Returns the statement and the uri it will create.
pub fn create_node_statement(
    mut properties: Properties,
) -> Result<(CypherQuery, String), GraphError> {
    let labels = take_labels(&mut properties)?;

    let uri = match properties.get("uri") {
        Some(Value::String(uri)) if !uri.is_empty() => uri.clone(),
        Some(Value::String(_)) | None => {
            let uri = identity::generate_uri(DEFAULT_URI_PREFIX);
            properties.insert("uri".to_string(), Value::String(uri.clone()));
            uri
        }
        Some(other) => {
            return Err(GraphError::InvalidInput(format!(
                "uri must be a string, got {other}"
            )))
        }
    };
    properties
        .entry("created_at")
        .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

    let cypher = format!(
        "OPTIONAL MATCH (existing {{uri: $uri}})
         WITH count(existing) AS taken
         WHERE taken = 0
         CREATE (n{labels} $props)
         RETURN {projection}",
        labels = escape_labels(&labels),
        projection = node_projection("n"),
    );

    let query = CypherQuery::new(cypher)
        .param("uri", uri.clone())
        .param("props", properties)
        .required("create_node");
    Ok((query, uri))
}

/// Build the CREATE for a typed arc between two nodes located by uri. The
/// statement yields no row when either endpoint is missing.
pub fn create_arc_statement(
    from_uri: &str,
    to_uri: &str,
    arc_type: &str,
    mut properties: Properties,
) -> Result<CypherQuery, GraphError> {
    if arc_type.is_empty() {
        return Err(GraphError::InvalidInput(
            "arc type must not be empty".to_string(),
        ));
    }
    properties
        .entry("created_at")
        .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

    let cypher = format!(
        "MATCH (a {{uri: $from_uri}}), (b {{uri: $to_uri}})
         CREATE (a)-[r:{rel} $props]->(b)
         RETURN elementId(r) AS element_id, type(r) AS uri, a.uri AS from_uri, b.uri AS to_uri",
        rel = escape_identifier(arc_type),
    );

    Ok(CypherQuery::new(cypher)
        .param("from_uri", from_uri)
        .param("to_uri", to_uri)
        .param("props", properties)
        .required("create_arc"))
}

/// Build the property-merge UPDATE for a node located by uri. Stamps
/// `updated_at`; yields no row when the uri matches nothing.
pub fn update_node_statement(uri: &str, mut properties: Properties) -> CypherQuery {
    properties.insert(
        "updated_at".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );
    CypherQuery::new(format!(
        "MATCH (n {{uri: $uri}})
         SET n += $props
         RETURN {}",
        node_projection("n")
    ))
    .param("uri", uri)
    .param("props", properties)
}

fn take_labels(properties: &mut Properties) -> Result<Vec<String>, GraphError> {
    let labels = match properties.remove("labels") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(label) if !label.is_empty() => Ok(label),
                other => Err(GraphError::InvalidInput(format!(
                    "labels must be non-empty strings, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(Value::String(label)) if !label.is_empty() => vec![label],
        Some(other) => {
            return Err(GraphError::InvalidInput(format!(
                "labels must be a list of strings, got {other}"
            )))
        }
    };
    Ok(labels)
}

// ── Row mapping ──────────────────────────────────────────────────

/// Build a [`Node`] from a row shaped by [`node_projection`].
pub fn collect_node(record: &Record) -> Node {
    Node {
        id: record.get_string("element_id"),
        uri: record.get_string("uri"),
        title: record.get_string("title"),
        description: record.get_string("description"),
        kind: NodeKind::from_labels(&record.get_strings("labels")),
        arcs: None,
    }
}

pub fn collect_arc(record: &Record) -> Arc {
    Arc {
        id: record.get_string("element_id"),
        uri: record.get_string("uri"),
        from_uri: record.get_string("from_uri"),
        to_uri: record.get_string("to_uri"),
    }
}

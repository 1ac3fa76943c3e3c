//! The ontology repository: shared plumbing for the class, attribute,
//! object, and signature operations implemented in sibling modules.

use serde_json::json;

use ontograph_core::{Node, NodeKind, OntologySettings, Properties};
use ontograph_graph::repository::{collect_node, node_projection};
use ontograph_graph::{
    CypherQuery, GraphClient, GraphConfig, GraphError, GraphRepository, QueryExecutor, Record,
};

use crate::error::{OntologyError, Result};

/// Ontology operations layered on a [`GraphRepository`].
///
/// Multi-statement operations run as one store transaction, so a failure
/// part-way leaves nothing behind.
pub struct OntologyRepository<E = GraphClient> {
    graph: GraphRepository<E>,
    strict_attributes: bool,
}

impl OntologyRepository<GraphClient> {
    pub async fn connect(config: &GraphConfig, settings: &OntologySettings) -> Result<Self> {
        let graph = GraphRepository::connect(config).await?;
        Ok(Self::new(graph, settings))
    }
}

impl<E: QueryExecutor> OntologyRepository<E> {
    pub fn new(graph: GraphRepository<E>, settings: &OntologySettings) -> Self {
        Self {
            graph,
            strict_attributes: settings.strict_attributes,
        }
    }

    /// The generic repository underneath, for node/arc level access.
    pub fn graph(&self) -> &GraphRepository<E> {
        &self.graph
    }

    pub fn strict_attributes(&self) -> bool {
        self.strict_attributes
    }

    /// Release the underlying connection.
    pub fn close(self) {
        self.graph.close();
    }

    /// Every node in the graph.
    pub async fn get_ontology(&self) -> Result<Vec<Node>> {
        Ok(self.graph.get_all_nodes().await?)
    }

    /// Create `uri` uniqueness constraints for every ontology label.
    pub async fn bootstrap_schema(&self) -> Result<()> {
        for kind in NodeKind::ALL {
            self.graph.ensure_unique_uri(kind.label()).await?;
        }
        Ok(())
    }

    // ── Shared helpers ───────────────────────────────────────────

    pub(crate) async fn require_class(&self, uri: &str) -> Result<Node> {
        self.get_class(uri)
            .await?
            .ok_or_else(|| OntologyError::ClassNotFound {
                uri: uri.to_string(),
            })
    }

    /// Run a node-returning query keyed by one `$uri` parameter. `pattern`
    /// must bind `var`.
    pub(crate) async fn nodes_matching(&self, pattern: &str, var: &str, uri: &str) -> Result<Vec<Node>> {
        let q = CypherQuery::new(format!("{pattern} RETURN DISTINCT {}", node_projection(var)))
            .param("uri", uri);
        let rows = self.graph.execute(q).await?;
        Ok(rows.iter().map(collect_node).collect())
    }

    pub(crate) async fn node_matching(&self, pattern: &str, var: &str, uri: &str) -> Result<Option<Node>> {
        Ok(self.nodes_matching(pattern, var, uri).await?.into_iter().next())
    }

    /// Run the statements atomically and return the node produced by the
    /// first one.
    pub(crate) async fn run_composite(&self, statements: Vec<CypherQuery>) -> Result<Node> {
        let results = self.graph.execute_atomic(statements).await?;
        results
            .first()
            .and_then(|rows| rows.first())
            .map(collect_node)
            .ok_or(OntologyError::Graph(GraphError::MutationFailed {
                operation: "composite",
            }))
    }

    pub(crate) async fn deleted_count(&self, q: CypherQuery) -> Result<bool> {
        let rows: Vec<Record> = self.graph.execute(q).await?;
        Ok(rows.first().map(|r| r.get_i64("deleted")).unwrap_or(0) > 0)
    }
}

/// Property map for a new ontology node of `kind`.
pub(crate) fn node_props(kind: NodeKind, uri: &str, title: &str, description: &str) -> Properties {
    let mut props = Properties::new();
    props.insert("uri".to_string(), json!(uri));
    props.insert("title".to_string(), json!(title));
    props.insert("description".to_string(), json!(description));
    props.insert("labels".to_string(), json!([kind.label()]));
    props
}

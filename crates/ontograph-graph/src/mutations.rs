//! Write operations for nodes and arcs.
//!
//! Nodes are created with a uri-uniqueness guard, updated by property merge,
//! and removed with DETACH DELETE so incident arcs never dangle.

use serde_json::Value;

use ontograph_core::{Arc, Node, Properties};

use crate::client::GraphError;
use crate::executor::{CypherQuery, QueryExecutor};
use crate::labels::escape_identifier;
use crate::repository::{
    collect_arc, collect_node, create_arc_statement, create_node_statement, update_node_statement,
    GraphRepository, DEFAULT_ARC_TYPE,
};

/// Attempts at drawing a fresh uri before giving up on a generated one.
const MAX_URI_ATTEMPTS: usize = 3;

impl<E: QueryExecutor> GraphRepository<E> {
    // ── Node Mutations ───────────────────────────────────────────

    /// Create a node from a property map.
    ///
    /// A `labels` entry becomes the node's labels. Without a `uri`, one is
    /// generated (`node_<random>`) and redrawn on collision. A caller-supplied
    /// uri that is already taken fails with [`GraphError::DuplicateUri`].
    pub async fn create_node(&self, properties: Properties) -> Result<Node, GraphError> {
        let generated = !matches!(properties.get("uri"), Some(Value::String(s)) if !s.is_empty());

        for attempt in 1..=MAX_URI_ATTEMPTS {
            let (q, uri) = create_node_statement(properties.clone())?;
            match self.execute(q).await {
                Ok(rows) => match rows.first() {
                    Some(row) => return Ok(collect_node(row)),
                    None => return Err(GraphError::MutationFailed { operation: "create_node" }),
                },
                Err(GraphError::MutationFailed { .. }) if generated && attempt < MAX_URI_ATTEMPTS => {
                    tracing::warn!(%uri, attempt, "Generated uri collided, retrying");
                }
                Err(GraphError::MutationFailed { .. }) => return Err(GraphError::DuplicateUri(uri)),
                Err(e) => return Err(e),
            }
        }

        Err(GraphError::MutationFailed { operation: "create_node" })
    }

    /// Merge properties into an existing node. Existing keys are overwritten,
    /// others are left untouched. Returns `None` if no node has the uri.
    pub async fn update_node(
        &self,
        uri: &str,
        properties: Properties,
    ) -> Result<Option<Node>, GraphError> {
        if properties.contains_key("labels") {
            return Err(GraphError::InvalidInput(
                "labels cannot be changed through a property update".to_string(),
            ));
        }
        if properties.is_empty() {
            return self.get_node_by_uri(uri).await;
        }
        let q = update_node_statement(uri, properties);

        let rows = self.execute(q).await?;
        Ok(rows.first().map(collect_node))
    }

    /// Remove a node and all of its arcs. Returns whether anything was deleted.
    pub async fn delete_node_by_uri(&self, uri: &str) -> Result<bool, GraphError> {
        let q = CypherQuery::new(
            "MATCH (n {uri: $uri})
             DETACH DELETE n
             RETURN count(n) AS deleted",
        )
        .param("uri", uri);

        let rows = self.execute(q).await?;
        Ok(rows.first().map(|r| r.get_i64("deleted")).unwrap_or(0) > 0)
    }

    /// Remove every node and arc. Returns the number of nodes deleted.
    pub async fn delete_all(&self) -> Result<i64, GraphError> {
        let q = CypherQuery::new(
            "MATCH (n)
             DETACH DELETE n
             RETURN count(n) AS deleted",
        );
        let rows = self.execute(q).await?;
        let deleted = rows.first().map(|r| r.get_i64("deleted")).unwrap_or(0);
        tracing::info!(deleted, "Cleared graph");
        Ok(deleted)
    }

    // ── Arc Mutations ────────────────────────────────────────────

    /// Create a typed arc between two existing nodes.
    ///
    /// `arc_type` defaults to [`DEFAULT_ARC_TYPE`]. Fails with
    /// [`GraphError::MutationFailed`] if either endpoint is missing.
    pub async fn create_arc(
        &self,
        from_uri: &str,
        to_uri: &str,
        arc_type: Option<&str>,
        properties: Properties,
    ) -> Result<Arc, GraphError> {
        let q = create_arc_statement(
            from_uri,
            to_uri,
            arc_type.unwrap_or(DEFAULT_ARC_TYPE),
            properties,
        )?;
        let rows = self.execute(q).await?;
        rows.first()
            .map(collect_arc)
            .ok_or(GraphError::MutationFailed { operation: "create_arc" })
    }

    /// Remove an arc by its store element id.
    pub async fn delete_arc_by_id(&self, arc_id: &str) -> Result<bool, GraphError> {
        let q = CypherQuery::new(
            "MATCH ()-[r]->()
             WHERE elementId(r) = $arc_id
             DELETE r
             RETURN count(r) AS deleted",
        )
        .param("arc_id", arc_id);

        let rows = self.execute(q).await?;
        Ok(rows.first().map(|r| r.get_i64("deleted")).unwrap_or(0) > 0)
    }

    // ── Schema ───────────────────────────────────────────────────

    /// Create a uniqueness constraint on `uri` for nodes with `label`.
    /// Idempotent.
    pub async fn ensure_unique_uri(&self, label: &str) -> Result<(), GraphError> {
        if label.is_empty() {
            return Err(GraphError::InvalidInput("label must not be empty".to_string()));
        }
        let q = CypherQuery::new(format!(
            "CREATE CONSTRAINT {name} IF NOT EXISTS
             FOR (n:{label}) REQUIRE n.uri IS UNIQUE",
            name = escape_identifier(&format!("uri_unique_{label}")),
            label = escape_identifier(label),
        ));
        self.execute(q).await?;
        tracing::info!(label, "Ensured uri uniqueness constraint");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ontograph_core::Properties;

    use crate::client::GraphError;
    use crate::testing::{node_row, row, MockExecutor};
    use crate::GraphRepository;

    fn props(value: serde_json::Value) -> Properties {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn create_node_returns_created_node() {
        let repo = GraphRepository::new(MockExecutor::new());
        repo.executor().push_rows(vec![node_row("n1", "A", &["X"])]);

        let node = repo
            .create_node(props(json!({"uri": "n1", "title": "A", "labels": ["X"]})))
            .await
            .unwrap();
        assert_eq!(node.uri, "n1");
        assert_eq!(node.title, "A");

        let queries = repo.executor().queries();
        let q = &queries[0];
        assert!(q.text().contains("CREATE (n:`X` $props)"));
        assert!(q.parameters()["props"].get("labels").is_none());
    }

    #[tokio::test]
    async fn create_node_with_taken_uri_is_duplicate() {
        let repo = GraphRepository::new(MockExecutor::new());
        let err = repo
            .create_node(props(json!({"uri": "taken"})))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateUri(uri) if uri == "taken"));
        assert_eq!(repo.executor().queries().len(), 1);
    }

    #[tokio::test]
    async fn create_node_redraws_generated_uri() {
        let repo = GraphRepository::new(MockExecutor::new());
        repo.executor().push_rows(vec![]);
        repo.executor().push_rows(vec![node_row("node_second", "", &[])]);

        let node = repo.create_node(Properties::new()).await.unwrap();
        assert_eq!(node.uri, "node_second");

        let queries = repo.executor().queries();
        assert_eq!(queries.len(), 2);
        assert_ne!(queries[0].parameters()["uri"], queries[1].parameters()["uri"]);
    }

    #[tokio::test]
    async fn create_arc_missing_endpoint_fails() {
        let repo = GraphRepository::new(MockExecutor::new());
        let err = repo
            .create_arc("missing", "n1", Some("T"), Properties::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::MutationFailed {
                operation: "create_arc"
            }
        ));
    }

    #[tokio::test]
    async fn create_arc_defaults_type() {
        let repo = GraphRepository::new(MockExecutor::new());
        repo.executor().push_rows(vec![row(json!({
            "element_id": "5:db:3",
            "uri": "RELATES_TO",
            "from_uri": "a",
            "to_uri": "b"
        }))]);

        let arc = repo
            .create_arc("a", "b", None, Properties::new())
            .await
            .unwrap();
        assert_eq!(arc.uri, "RELATES_TO");
        assert_eq!(arc.id, "5:db:3");
        assert!(repo.executor().queries()[0]
            .text()
            .contains("[r:`RELATES_TO` $props]"));
    }

    #[tokio::test]
    async fn update_node_merges_properties() {
        let repo = GraphRepository::new(MockExecutor::new());
        repo.executor().push_rows(vec![node_row("n1", "B", &[])]);

        let node = repo
            .update_node("n1", props(json!({"title": "B"})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(node.title, "B");

        let queries = repo.executor().queries();
        let q = &queries[0];
        assert!(q.text().contains("SET n += $props"));
        assert_eq!(q.parameters()["props"]["title"], "B");
        assert!(q.parameters()["props"].get("updated_at").is_some());
    }

    #[tokio::test]
    async fn update_node_rejects_labels_and_handles_missing() {
        let repo = GraphRepository::new(MockExecutor::new());
        assert!(matches!(
            repo.update_node("n1", props(json!({"labels": ["X"]}))).await,
            Err(GraphError::InvalidInput(_))
        ));
        assert!(repo
            .update_node("gone", props(json!({"title": "x"})))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_went() {
        let repo = GraphRepository::new(MockExecutor::new());
        repo.executor().push_rows(vec![row(json!({"deleted": 1}))]);
        repo.executor().push_rows(vec![row(json!({"deleted": 0}))]);

        assert!(repo.delete_node_by_uri("n1").await.unwrap());
        assert!(!repo.delete_arc_by_id("5:db:9").await.unwrap());

        let queries = repo.executor().queries();
        assert!(queries[0].text().contains("DETACH DELETE n"));
        assert_eq!(queries[1].parameters()["arc_id"], "5:db:9");
    }

    #[tokio::test]
    async fn constraint_names_are_escaped() {
        let repo = GraphRepository::new(MockExecutor::new());
        repo.ensure_unique_uri("Class").await.unwrap();
        let queries = repo.executor().queries();
        let q = &queries[0];
        assert!(q.text().contains("CREATE CONSTRAINT `uri_unique_Class` IF NOT EXISTS"));
        assert!(q.text().contains("FOR (n:`Class`)"));
    }
}

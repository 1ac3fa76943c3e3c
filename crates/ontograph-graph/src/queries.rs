//! Read operations over nodes and arcs.
//!
//! Reads never fail on absence: a missing match is `None` or an empty list.

use ontograph_core::Node;

use crate::client::GraphError;
use crate::executor::{CypherQuery, QueryExecutor};
use crate::labels::escape_labels;
use crate::repository::{collect_arc, collect_node, node_projection, GraphRepository};

impl<E: QueryExecutor> GraphRepository<E> {
    // ── Node Listings ────────────────────────────────────────────

    /// Every node in the graph, core fields only.
    pub async fn get_all_nodes(&self) -> Result<Vec<Node>, GraphError> {
        let q = CypherQuery::new(format!("MATCH (n) RETURN {}", node_projection("n")));
        let rows = self.execute(q).await?;
        Ok(rows.iter().map(collect_node).collect())
    }

    /// Every node with its outgoing arcs. Nodes without outgoing arcs are
    /// included with an empty arc list.
    pub async fn get_all_nodes_and_arcs(&self) -> Result<Vec<Node>, GraphError> {
        let q = CypherQuery::new(format!(
            "MATCH (n)
             OPTIONAL MATCH (n)-[r]->(m)
             WITH n, collect({{
               element_id: elementId(r),
               uri: type(r),
               from_uri: n.uri,
               to_uri: m.uri
             }}) AS arcs
             RETURN {}, arcs",
            node_projection("n")
        ));

        let rows = self.execute(q).await?;
        let nodes = rows
            .iter()
            .map(|row| {
                let mut node = collect_node(row);
                // OPTIONAL MATCH leaves one placeholder map with a null id.
                let arcs = row
                    .get_records("arcs")
                    .iter()
                    .filter(|arc| arc.get("element_id").is_some())
                    .map(collect_arc)
                    .collect();
                node.arcs = Some(arcs);
                node
            })
            .collect();
        Ok(nodes)
    }

    /// Nodes carrying all of the given labels. An empty label set matches
    /// nothing and issues no query.
    pub async fn get_nodes_by_labels<S: AsRef<str>>(
        &self,
        labels: &[S],
    ) -> Result<Vec<Node>, GraphError> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }

        let q = CypherQuery::new(format!(
            "MATCH (n{}) RETURN {}",
            escape_labels(labels),
            node_projection("n")
        ));
        let rows = self.execute(q).await?;
        Ok(rows.iter().map(collect_node).collect())
    }

    // ── Single Node Lookups ──────────────────────────────────────

    pub async fn get_node_by_uri(&self, uri: &str) -> Result<Option<Node>, GraphError> {
        let q = CypherQuery::new(format!(
            "MATCH (n {{uri: $uri}}) RETURN {} LIMIT 1",
            node_projection("n")
        ))
        .param("uri", uri);

        let rows = self.execute(q).await?;
        Ok(rows.first().map(collect_node))
    }

    // ── Statistics ───────────────────────────────────────────────

    pub async fn count_nodes(&self) -> Result<i64, GraphError> {
        let rows = self
            .execute(CypherQuery::new("MATCH (n) RETURN count(n) AS cnt"))
            .await?;
        Ok(rows.first().map(|r| r.get_i64("cnt")).unwrap_or(0))
    }

    pub async fn count_arcs(&self) -> Result<i64, GraphError> {
        let rows = self
            .execute(CypherQuery::new("MATCH ()-[r]->() RETURN count(r) AS cnt"))
            .await?;
        Ok(rows.first().map(|r| r.get_i64("cnt")).unwrap_or(0))
    }
}

//! Classes and the `subclass_of` hierarchy.

use ontograph_core::{Arc, Node, NodeKind, Properties, Relation};
use ontograph_graph::repository::{create_arc_statement, create_node_statement};
use ontograph_graph::{identity, CypherQuery, QueryExecutor};

use crate::error::Result;
use crate::repository::{node_props, OntologyRepository};

impl<E: QueryExecutor> OntologyRepository<E> {
    // ── Lookups ──────────────────────────────────────────────────

    pub async fn get_class(&self, class_uri: &str) -> Result<Option<Node>> {
        self.node_matching("MATCH (c:Class {uri: $uri})", "c", class_uri)
            .await
    }

    /// Root classes: those with no outgoing `subclass_of`.
    pub async fn get_ontology_parent_classes(&self) -> Result<Vec<Node>> {
        let q = CypherQuery::new(format!(
            "MATCH (c:Class)
             WHERE NOT (c)-[:subclass_of]->()
             RETURN {}",
            ontograph_graph::repository::node_projection("c")
        ));
        let rows = self.graph().execute(q).await?;
        Ok(rows
            .iter()
            .map(ontograph_graph::repository::collect_node)
            .collect())
    }

    pub async fn get_class_parents(&self, class_uri: &str) -> Result<Vec<Node>> {
        self.nodes_matching(
            "MATCH (:Class {uri: $uri})-[:subclass_of]->(parent:Class)",
            "parent",
            class_uri,
        )
        .await
    }

    pub async fn get_class_children(&self, class_uri: &str) -> Result<Vec<Node>> {
        self.nodes_matching(
            "MATCH (:Class {uri: $uri})<-[:subclass_of]-(child:Class)",
            "child",
            class_uri,
        )
        .await
    }

    /// Objects that are direct instances of the class.
    pub async fn get_class_objects(&self, class_uri: &str) -> Result<Vec<Node>> {
        self.nodes_matching(
            "MATCH (:Class {uri: $uri})<-[:instance_of]-(obj:Object)",
            "obj",
            class_uri,
        )
        .await
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Create a class, optionally as a subclass of an existing class. The
    /// node and its `subclass_of` arc are written in one transaction.
    pub async fn create_class(
        &self,
        title: &str,
        description: &str,
        parent_uri: Option<&str>,
    ) -> Result<Node> {
        if let Some(parent) = parent_uri {
            self.require_class(parent).await?;
        }

        let class_uri = identity::generate_uri(NodeKind::Class.uri_prefix());
        let (create, _) =
            create_node_statement(node_props(NodeKind::Class, &class_uri, title, description))?;
        let mut statements = vec![create];
        if let Some(parent) = parent_uri {
            statements.push(create_arc_statement(
                &class_uri,
                parent,
                Relation::SubclassOf.as_str(),
                Properties::new(),
            )?);
        }

        let class = self.run_composite(statements).await?;
        tracing::info!(class_uri = %class.uri, parent_uri = ?parent_uri, "Created class");
        Ok(class)
    }

    /// Change a class's title and description. Returns `None` if no class
    /// has the uri.
    pub async fn update_class(
        &self,
        class_uri: &str,
        title: &str,
        description: &str,
    ) -> Result<Option<Node>> {
        if self.get_class(class_uri).await?.is_none() {
            return Ok(None);
        }
        let mut props = Properties::new();
        props.insert("title".to_string(), title.into());
        props.insert("description".to_string(), description.into());
        Ok(self.graph().update_node(class_uri, props).await?)
    }

    /// Attach an existing class to an existing parent class.
    ///
    /// Fails with [`crate::OntologyError::ClassNotFound`] if either class is
    /// missing. No cycle or duplicate-parent check is made.
    pub async fn add_class_parent(&self, parent_uri: &str, target_uri: &str) -> Result<Arc> {
        self.require_class(target_uri).await?;
        self.require_class(parent_uri).await?;

        let arc = self
            .graph()
            .create_arc(
                target_uri,
                parent_uri,
                Some(Relation::SubclassOf.as_str()),
                Properties::new(),
            )
            .await?;
        tracing::info!(%parent_uri, %target_uri, "Attached class parent");
        Ok(arc)
    }

    /// Delete a class together with every descendant class (transitively via
    /// `subclass_of`), every object that is an instance of any of them, and
    /// those objects' value nodes. One statement; returns whether anything
    /// was deleted.
    pub async fn delete_class(&self, class_uri: &str) -> Result<bool> {
        let q = CypherQuery::new(
            "MATCH (c:Class {uri: $uri})
             OPTIONAL MATCH (descendant:Class)-[:subclass_of*1..]->(c)
             WITH c, collect(DISTINCT descendant) AS descendants
             WITH [c] + descendants AS classes
             UNWIND classes AS cls
             OPTIONAL MATCH (cls)<-[:instance_of]-(obj:Object)
             OPTIONAL MATCH (obj)-->(value:Property)
             WITH classes, collect(DISTINCT obj) AS objects, collect(DISTINCT value) AS values
             UNWIND classes + objects + values AS doomed
             WITH DISTINCT doomed
             DETACH DELETE doomed
             RETURN count(doomed) AS deleted",
        )
        .param("uri", class_uri);

        let deleted = self.deleted_count(q).await?;
        if deleted {
            tracing::info!(%class_uri, "Deleted class hierarchy");
        }
        Ok(deleted)
    }
}

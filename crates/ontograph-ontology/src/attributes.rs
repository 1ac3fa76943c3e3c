//! Attribute declarations: `DatatypeProperty` and `ObjectProperty` nodes
//! attached to classes.

use ontograph_core::{Node, NodeKind, Properties, Relation};
use ontograph_graph::repository::{create_arc_statement, create_node_statement};
use ontograph_graph::{identity, CypherQuery, GraphError, QueryExecutor};

use crate::error::{OntologyError, Result};
use crate::repository::{node_props, OntologyRepository};

impl<E: QueryExecutor> OntologyRepository<E> {
    /// Declare a scalar attribute on a class.
    ///
    /// `attr_uri` is used as given; a taken uri fails with
    /// [`GraphError::DuplicateUri`]. Without one, an `attr_` uri is generated.
    pub async fn add_class_attribute(
        &self,
        class_uri: &str,
        attr_name: &str,
        attr_uri: Option<&str>,
    ) -> Result<Node> {
        self.require_class(class_uri).await?;

        let attr_uri = match attr_uri {
            Some(uri) if !uri.is_empty() => uri.to_string(),
            _ => identity::generate_uri(NodeKind::DatatypeProperty.uri_prefix()),
        };
        let (create, _) = create_node_statement(node_props(
            NodeKind::DatatypeProperty,
            &attr_uri,
            attr_name,
            &format!("DatatypeProperty for {attr_name}"),
        ))?;
        let applies_to = create_arc_statement(
            &attr_uri,
            class_uri,
            Relation::AppliesTo.as_str(),
            Properties::new(),
        )?;

        let attr = self
            .run_composite(vec![create, applies_to])
            .await
            .map_err(|e| match e {
                OntologyError::Graph(GraphError::MutationFailed {
                    operation: "create_node",
                }) => GraphError::DuplicateUri(attr_uri.clone()).into(),
                other => other,
            })?;
        tracing::info!(%class_uri, attr_uri = %attr.uri, "Added class attribute");
        Ok(attr)
    }

    /// Declare a relational attribute on `class_uri` whose values are
    /// instances of `range_class_uri`.
    pub async fn add_class_object_attribute(
        &self,
        class_uri: &str,
        attr_name: &str,
        range_class_uri: &str,
    ) -> Result<Node> {
        self.require_class(class_uri).await?;
        self.require_class(range_class_uri).await?;

        let attr_uri = identity::generate_uri(NodeKind::ObjectProperty.uri_prefix());
        let (create, _) = create_node_statement(node_props(
            NodeKind::ObjectProperty,
            &attr_uri,
            attr_name,
            &format!("ObjectProperty for {attr_name}"),
        ))?;
        let statements = vec![
            create,
            create_arc_statement(
                &attr_uri,
                class_uri,
                Relation::AppliesTo.as_str(),
                Properties::new(),
            )?,
            create_arc_statement(
                &attr_uri,
                range_class_uri,
                Relation::PointsTo.as_str(),
                Properties::new(),
            )?,
        ];

        let attr = self.run_composite(statements).await?;
        tracing::info!(
            %class_uri,
            %range_class_uri,
            attr_uri = %attr.uri,
            "Added class object attribute"
        );
        Ok(attr)
    }

    /// Remove an attribute declared on a class. Either property kind is
    /// accepted; the node is detach-deleted so its `points_to` arc goes too.
    pub async fn delete_class_attribute(&self, class_uri: &str, attr_uri: &str) -> Result<bool> {
        let q = CypherQuery::new(
            "MATCH (attr {uri: $attr_uri})-[:applies_to]->(:Class {uri: $class_uri})
             WHERE attr:DatatypeProperty OR attr:ObjectProperty
             WITH DISTINCT attr
             DETACH DELETE attr
             RETURN count(attr) AS deleted",
        )
        .param("class_uri", class_uri)
        .param("attr_uri", attr_uri);

        let deleted = self.deleted_count(q).await?;
        if deleted {
            tracing::info!(%class_uri, %attr_uri, "Deleted class attribute");
        }
        Ok(deleted)
    }

    /// Remove an `ObjectProperty` node wherever it is attached.
    pub async fn delete_class_object_attribute(&self, attr_uri: &str) -> Result<bool> {
        let q = CypherQuery::new(
            "MATCH (attr:ObjectProperty {uri: $uri})
             DETACH DELETE attr
             RETURN count(attr) AS deleted",
        )
        .param("uri", attr_uri);
        self.deleted_count(q).await
    }
}

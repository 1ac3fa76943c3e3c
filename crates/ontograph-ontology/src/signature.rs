//! Class signature introspection.

use ontograph_core::{Direction, Signature, SignatureObjParam, SignatureParam};
use ontograph_graph::{CypherQuery, QueryExecutor};

use crate::error::Result;
use crate::repository::OntologyRepository;

impl<E: QueryExecutor> OntologyRepository<E> {
    /// Attributes declared directly on a class: one hop of `applies_to`.
    /// Ancestor attributes are not included. An unknown class yields an
    /// empty signature.
    pub async fn collect_signature(&self, class_uri: &str) -> Result<Signature> {
        let datatype = CypherQuery::new(
            "MATCH (c:Class {uri: $uri})<-[:applies_to]-(attr:DatatypeProperty)
             RETURN attr.uri AS uri, attr.title AS title
             ORDER BY title, uri",
        )
        .param("uri", class_uri);

        let object = CypherQuery::new(
            "MATCH (c:Class {uri: $uri})<-[:applies_to]-(attr:ObjectProperty)-[:points_to]->(target:Class)
             RETURN attr.uri AS uri, attr.title AS title, target.uri AS target_class_uri
             ORDER BY title, uri",
        )
        .param("uri", class_uri);

        let params = self
            .graph()
            .execute(datatype)
            .await?
            .iter()
            .map(|r| SignatureParam {
                title: r.get_string("title"),
                uri: r.get_string("uri"),
            })
            .collect();

        let obj_params = self
            .graph()
            .execute(object)
            .await?
            .iter()
            .map(|r| SignatureObjParam {
                title: r.get_string("title"),
                uri: r.get_string("uri"),
                target_class_uri: r.get_string("target_class_uri"),
                direction: Direction::Outgoing,
            })
            .collect();

        Ok(Signature { params, obj_params })
    }
}

//! Example ontology seeding.
//!
//! Builds Person ← Author and City, declares attributes on Author, and
//! creates one city and one author that refers to it.

use serde::Serialize;
use serde_json::json;

use ontograph_core::{Node, Properties, Signature};
use ontograph_graph::QueryExecutor;
use ontograph_ontology::OntologyRepository;

use crate::error::Result;

/// What the demo created.
#[derive(Debug, Serialize)]
pub struct DemoSummary {
    pub classes: Vec<Node>,
    pub author_signature: Signature,
    pub objects: Vec<Node>,
}

pub async fn seed<E: QueryExecutor>(repo: &OntologyRepository<E>) -> Result<DemoSummary> {
    let person = repo
        .create_class("Person", "Base class for all people", None)
        .await?;
    let author = repo
        .create_class("Author", "Writers of literary works", Some(&person.uri))
        .await?;
    let city = repo.create_class("City", "Cities", None).await?;

    repo.add_class_attribute(&author.uri, "name", None).await?;
    repo.add_class_attribute(&author.uri, "age", None).await?;
    repo.add_class_object_attribute(&author.uri, "born_in", &city.uri)
        .await?;
    let author_signature = repo.collect_signature(&author.uri).await?;

    let moscow = repo
        .create_object(
            &city.uri,
            &object_data(json!({
                "title": "Moscow",
                "description": "Capital of Russia"
            })),
        )
        .await?;
    let pushkin = repo
        .create_object(
            &author.uri,
            &object_data(json!({
                "title": "Alexander Pushkin",
                "description": "Russian poet",
                "name": "Alexander Sergeyevich Pushkin",
                "age": 37,
                "born_in": moscow.uri
            })),
        )
        .await?;

    tracing::info!(author_uri = %author.uri, "Seeded demo ontology");
    Ok(DemoSummary {
        classes: vec![person, author, city],
        author_signature,
        objects: vec![moscow, pushkin],
    })
}

fn object_data(value: serde_json::Value) -> Properties {
    value.as_object().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use ontograph_core::OntologySettings;
    use ontograph_graph::testing::{node_row, MockExecutor};
    use ontograph_graph::GraphRepository;

    use super::*;

    #[tokio::test]
    async fn demo_runs_every_composite_atomically() {
        let repo = OntologyRepository::new(
            GraphRepository::new(MockExecutor::new()),
            &OntologySettings {
                strict_attributes: false,
            },
        );
        let exec = repo.graph().executor();
        for _ in 0..40 {
            exec.push_rows(vec![node_row("n", "demo", &["Class"])]);
        }

        let summary = seed(&repo).await.unwrap();
        assert_eq!(summary.classes.len(), 3);
        assert_eq!(summary.objects.len(), 2);

        // 3 classes, 3 attributes, 2 objects.
        let batches = exec.batches();
        assert_eq!(batches.len(), 8);
        assert!(batches.iter().all(|b| b.committed));
        // Pushkin: object, instance_of, and a value node plus arc per attribute.
        assert_eq!(batches[7].statements, 8);
    }
}

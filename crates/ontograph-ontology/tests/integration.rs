//! Integration tests for ontograph-ontology against a live Neo4j instance.
//!
//! Run with: cargo test --package ontograph-ontology --test integration -- --ignored
//!
//! Skipped automatically if Neo4j is not available. Each test removes the
//! classes it created (which cascades to their objects and values).

use serde_json::json;

use ontograph_core::{OntologySettings, Properties};
use ontograph_graph::{GraphConfig, GraphError};
use ontograph_ontology::{OntologyError, OntologyRepository};

async fn connect_or_skip(strict: bool) -> Option<OntologyRepository> {
    let settings = OntologySettings {
        strict_attributes: strict,
    };
    match OntologyRepository::connect(&GraphConfig::default(), &settings).await {
        Ok(repo) => Some(repo),
        Err(e) => {
            eprintln!("Skipping integration test (Neo4j not available): {e}");
            None
        }
    }
}

fn data(value: serde_json::Value) -> Properties {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_class_round_trip() {
    let Some(repo) = connect_or_skip(true).await else {
        return;
    };

    let person = repo.create_class("Person", "A human", None).await.unwrap();
    let author = repo
        .create_class("Author", "Writes books", Some(&person.uri))
        .await
        .unwrap();

    let fetched = repo.get_class(&author.uri).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Author");
    let parents = repo.get_class_parents(&author.uri).await.unwrap();
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].uri, person.uri);
    let children = repo.get_class_children(&person.uri).await.unwrap();
    assert!(children.iter().any(|c| c.uri == author.uri));
    let roots = repo.get_ontology_parent_classes().await.unwrap();
    assert!(roots.iter().any(|c| c.uri == person.uri));
    assert!(!roots.iter().any(|c| c.uri == author.uri));

    assert!(repo.delete_class(&person.uri).await.unwrap());
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_signature_is_not_inherited() {
    let Some(repo) = connect_or_skip(true).await else {
        return;
    };

    let c = repo.create_class("C", "", None).await.unwrap();
    let d = repo.create_class("D", "", None).await.unwrap();
    let sub = repo.create_class("SubC", "", Some(&c.uri)).await.unwrap();
    let p = repo.add_class_attribute(&c.uri, "p", None).await.unwrap();
    let q = repo
        .add_class_object_attribute(&c.uri, "q", &d.uri)
        .await
        .unwrap();

    let signature = repo.collect_signature(&c.uri).await.unwrap();
    assert_eq!(signature.params.len(), 1);
    assert_eq!(signature.params[0].uri, p.uri);
    assert_eq!(signature.obj_params.len(), 1);
    assert_eq!(signature.obj_params[0].uri, q.uri);
    assert_eq!(signature.obj_params[0].target_class_uri, d.uri);

    assert!(repo.collect_signature(&sub.uri).await.unwrap().is_empty());

    assert!(repo.delete_class_attribute(&c.uri, &q.uri).await.unwrap());
    assert!(repo
        .collect_signature(&c.uri)
        .await
        .unwrap()
        .obj_params
        .is_empty());

    repo.delete_class(&c.uri).await.unwrap();
    repo.delete_class(&d.uri).await.unwrap();
    repo.graph().delete_node_by_uri(&p.uri).await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_delete_class_cascades() {
    let Some(repo) = connect_or_skip(false).await else {
        return;
    };

    let a = repo.create_class("A", "", None).await.unwrap();
    let b = repo.create_class("B", "", Some(&a.uri)).await.unwrap();
    let c = repo.create_class("C", "", Some(&a.uri)).await.unwrap();
    let instance = repo
        .create_object(&c.uri, &data(json!({"title": "inst", "x": "1"})))
        .await
        .unwrap();
    let values = repo.get_object_properties(&instance.uri).await.unwrap();
    assert_eq!(values.len(), 1);

    assert!(repo.delete_class(&a.uri).await.unwrap());

    assert!(repo.get_class(&a.uri).await.unwrap().is_none());
    assert!(repo.get_class(&b.uri).await.unwrap().is_none());
    assert!(repo.get_class(&c.uri).await.unwrap().is_none());
    assert!(repo.get_object(&instance.uri).await.unwrap().is_none());
    assert!(repo
        .graph()
        .get_node_by_uri(&values[0].uri)
        .await
        .unwrap()
        .is_none());
    assert!(!repo.delete_class(&a.uri).await.unwrap());
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_update_object_replaces_values() {
    let Some(repo) = connect_or_skip(false).await else {
        return;
    };

    let class = repo.create_class("Thing", "", None).await.unwrap();
    let object = repo
        .create_object(&class.uri, &data(json!({"title": "t", "x": "1"})))
        .await
        .unwrap();

    repo.update_object(&object.uri, &data(json!({"title": "t2", "y": 2})))
        .await
        .unwrap()
        .unwrap();

    let values = repo.get_object_properties(&object.uri).await.unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].key, "y");
    assert_eq!(values[0].value, "2");
    assert_eq!(
        repo.get_object_class(&object.uri).await.unwrap().unwrap().uri,
        class.uri
    );

    repo.delete_class(&class.uri).await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_strict_mode_writes_nothing_on_undeclared_key() {
    let Some(repo) = connect_or_skip(true).await else {
        return;
    };

    let class = repo.create_class("Strict", "", None).await.unwrap();
    repo.add_class_attribute(&class.uri, "name", None)
        .await
        .unwrap();

    let err = repo
        .create_object(&class.uri, &data(json!({"name": "n", "other": "o"})))
        .await
        .unwrap_err();
    assert!(matches!(err, OntologyError::UndeclaredAttribute { .. }));
    assert!(repo.get_class_objects(&class.uri).await.unwrap().is_empty());

    let ok = repo
        .create_object(&class.uri, &data(json!({"name": "n"})))
        .await
        .unwrap();
    assert_eq!(repo.get_class_objects(&class.uri).await.unwrap()[0].uri, ok.uri);

    let signature = repo.collect_signature(&class.uri).await.unwrap();
    repo.delete_class(&class.uri).await.unwrap();
    repo.graph()
        .delete_node_by_uri(&signature.params[0].uri)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_add_parent_to_missing_class_fails() {
    let Some(repo) = connect_or_skip(true).await else {
        return;
    };

    let class = repo.create_class("Lonely", "", None).await.unwrap();
    let err = repo
        .add_class_parent("class_doesnotexist", &class.uri)
        .await
        .unwrap_err();
    assert!(matches!(err, OntologyError::ClassNotFound { .. }));

    let before = repo.graph().count_arcs().await.unwrap();
    let err = repo
        .graph()
        .create_arc("class_doesnotexist", &class.uri, Some("T"), Properties::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::MutationFailed {
            operation: "create_arc"
        }
    ));
    assert_eq!(repo.graph().count_arcs().await.unwrap(), before);

    repo.delete_class(&class.uri).await.unwrap();
}

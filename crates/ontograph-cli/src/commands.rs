//! Command handlers. Each returns the JSON document printed to stdout.

use serde_json::{json, Value};

use ontograph_core::Properties;
use ontograph_graph::QueryExecutor;
use ontograph_ontology::OntologyRepository;

use crate::cli::{ClassCommand, Command, ObjectCommand};
use crate::demo;
use crate::error::{CliError, Result};

pub async fn execute<E: QueryExecutor>(
    repo: &OntologyRepository<E>,
    command: Command,
) -> Result<Value> {
    let graph = repo.graph();
    match command {
        Command::Bootstrap => {
            repo.bootstrap_schema().await?;
            Ok(json!({ "bootstrapped": true }))
        }
        Command::Stats => Ok(json!({
            "nodes": graph.count_nodes().await?,
            "arcs": graph.count_arcs().await?,
        })),
        Command::Clear { yes } => {
            if !yes {
                return Err(CliError::NotConfirmed("clear the database"));
            }
            Ok(json!({ "deleted": graph.delete_all().await? }))
        }
        Command::Nodes { labels, with_arcs } => {
            let nodes = if !labels.is_empty() {
                graph.get_nodes_by_labels(&labels).await?
            } else if with_arcs {
                graph.get_all_nodes_and_arcs().await?
            } else {
                repo.get_ontology().await?
            };
            Ok(serde_json::to_value(nodes)?)
        }
        Command::Node { uri } => {
            let node = graph.get_node_by_uri(&uri).await?;
            let node = node.ok_or(CliError::NotFound { kind: "Node", uri })?;
            Ok(serde_json::to_value(node)?)
        }
        Command::Roots => Ok(serde_json::to_value(
            repo.get_ontology_parent_classes().await?,
        )?),
        Command::Query { cypher, params } => {
            let params = match params {
                Some(raw) => parse_object(&raw)?,
                None => Properties::new(),
            };
            let rows = graph.run_custom_query(&cypher, params).await?;
            Ok(Value::Array(
                rows.into_iter()
                    .map(|r| Value::Object(r.into_inner()))
                    .collect(),
            ))
        }
        Command::Demo => Ok(serde_json::to_value(demo::seed(repo).await?)?),
        Command::Class(cmd) => class(repo, cmd).await,
        Command::Object(cmd) => object(repo, cmd).await,
    }
}

async fn class<E: QueryExecutor>(repo: &OntologyRepository<E>, command: ClassCommand) -> Result<Value> {
    let value = match command {
        ClassCommand::Show { uri } => {
            let class = repo
                .get_class(&uri)
                .await?
                .ok_or_else(|| class_not_found(&uri))?;
            let signature = repo.collect_signature(&uri).await?;
            json!({ "class": class, "signature": signature })
        }
        ClassCommand::Create {
            title,
            description,
            parent,
        } => serde_json::to_value(
            repo.create_class(&title, &description, parent.as_deref())
                .await?,
        )?,
        ClassCommand::Update {
            uri,
            title,
            description,
        } => {
            let class = repo
                .update_class(&uri, &title, &description)
                .await?
                .ok_or_else(|| class_not_found(&uri))?;
            serde_json::to_value(class)?
        }
        ClassCommand::Delete { uri } => json!({ "deleted": repo.delete_class(&uri).await? }),
        ClassCommand::Children { uri } => serde_json::to_value(repo.get_class_children(&uri).await?)?,
        ClassCommand::Parents { uri } => serde_json::to_value(repo.get_class_parents(&uri).await?)?,
        ClassCommand::Objects { uri } => serde_json::to_value(repo.get_class_objects(&uri).await?)?,
        ClassCommand::Signature { uri } => serde_json::to_value(repo.collect_signature(&uri).await?)?,
        ClassCommand::AddParent { uri, parent } => {
            serde_json::to_value(repo.add_class_parent(&parent, &uri).await?)?
        }
        ClassCommand::AddAttribute {
            uri,
            name,
            attr_uri,
        } => serde_json::to_value(
            repo.add_class_attribute(&uri, &name, attr_uri.as_deref())
                .await?,
        )?,
        ClassCommand::AddObjectAttribute { uri, name, range } => serde_json::to_value(
            repo.add_class_object_attribute(&uri, &name, &range)
                .await?,
        )?,
        ClassCommand::RemoveAttribute { uri, attr_uri } => {
            json!({ "deleted": repo.delete_class_attribute(&uri, &attr_uri).await? })
        }
        ClassCommand::RemoveObjectAttribute { attr_uri } => {
            json!({ "deleted": repo.delete_class_object_attribute(&attr_uri).await? })
        }
    };
    Ok(value)
}

async fn object<E: QueryExecutor>(
    repo: &OntologyRepository<E>,
    command: ObjectCommand,
) -> Result<Value> {
    let value = match command {
        ObjectCommand::Show { uri } => {
            let object = repo
                .get_object(&uri)
                .await?
                .ok_or_else(|| object_not_found(&uri))?;
            let class = repo.get_object_class(&uri).await?;
            let properties = repo.get_object_properties(&uri).await?;
            json!({ "object": object, "class": class, "properties": properties })
        }
        ObjectCommand::Create { class_uri, data } => {
            let data = match data {
                Some(raw) => parse_object(&raw)?,
                None => Properties::new(),
            };
            serde_json::to_value(repo.create_object(&class_uri, &data).await?)?
        }
        ObjectCommand::Update { uri, data } => {
            let object = repo
                .update_object(&uri, &parse_object(&data)?)
                .await?
                .ok_or_else(|| object_not_found(&uri))?;
            serde_json::to_value(object)?
        }
        ObjectCommand::Delete { uri } => json!({ "deleted": repo.delete_object(&uri).await? }),
        ObjectCommand::Properties { uri } => {
            serde_json::to_value(repo.get_object_properties(&uri).await?)?
        }
    };
    Ok(value)
}

/// Parse a JSON argument that must be an object.
pub fn parse_object(raw: &str) -> Result<Properties> {
    match serde_json::from_str(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(CliError::InvalidArgument(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

fn class_not_found(uri: &str) -> CliError {
    CliError::NotFound {
        kind: "Class",
        uri: uri.to_string(),
    }
}

fn object_not_found(uri: &str) -> CliError {
    CliError::NotFound {
        kind: "Object",
        uri: uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use ontograph_core::OntologySettings;
    use ontograph_graph::testing::{node_row, row, MockExecutor};
    use ontograph_graph::GraphRepository;

    use super::*;

    fn repo() -> OntologyRepository<MockExecutor> {
        OntologyRepository::new(
            GraphRepository::new(MockExecutor::new()),
            &OntologySettings::default(),
        )
    }

    #[test]
    fn parse_object_rejects_non_objects() {
        assert_eq!(parse_object(r#"{"a": 1}"#).unwrap()["a"], 1);
        assert!(matches!(
            parse_object("[1, 2]"),
            Err(CliError::InvalidArgument(_))
        ));
        assert!(matches!(parse_object("{"), Err(CliError::Json(_))));
    }

    #[tokio::test]
    async fn clear_requires_confirmation() {
        let repo = repo();
        let err = execute(&repo, Command::Clear { yes: false })
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::NotConfirmed(_)));
        assert!(repo.graph().executor().queries().is_empty());
    }

    #[tokio::test]
    async fn stats_reports_counts() {
        let repo = repo();
        let exec = repo.graph().executor();
        exec.push_rows(vec![row(json!({"cnt": 7}))]);
        exec.push_rows(vec![row(json!({"cnt": 3}))]);

        let out = execute(&repo, Command::Stats).await.unwrap();
        assert_eq!(out, json!({"nodes": 7, "arcs": 3}));
    }

    #[tokio::test]
    async fn missing_class_is_not_found() {
        let repo = repo();
        let err = execute(
            &repo,
            Command::Class(ClassCommand::Show {
                uri: "class_x".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::NotFound { kind: "Class", .. }));
    }

    #[tokio::test]
    async fn query_passes_params_and_returns_rows() {
        let repo = repo();
        repo.graph()
            .executor()
            .push_rows(vec![row(json!({"n": 1}))]);

        let out = execute(
            &repo,
            Command::Query {
                cypher: "RETURN $n AS n".to_string(),
                params: Some(r#"{"n": 1}"#.to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(out, json!([{"n": 1}]));
        assert_eq!(repo.graph().executor().queries()[0].parameters()["n"], 1);
    }

    #[tokio::test]
    async fn object_show_combines_lookups() {
        let repo = repo();
        let exec = repo.graph().executor();
        exec.push_rows(vec![node_row("obj_1", "Leo", &["Object"])]);
        exec.push_rows(vec![node_row("class_a", "Author", &["Class"])]);
        exec.push_rows(vec![row(json!({"key": "age", "value": "82", "uri": "prop_1"}))]);

        let out = execute(
            &repo,
            Command::Object(ObjectCommand::Show {
                uri: "obj_1".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(out["object"]["title"], "Leo");
        assert_eq!(out["class"]["uri"], "class_a");
        assert_eq!(out["properties"][0]["key"], "age");
    }
}

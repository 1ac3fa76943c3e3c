//! Neo4j connection management and the store-backed query executor.

use async_trait::async_trait;
use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType, ConfigBuilder, Graph, Query};
use serde_json::Value;

use ontograph_core::{Neo4jSettings, Properties};

use crate::executor::{CypherQuery, QueryExecutor, Record};

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Mutation {operation} matched nothing")]
    MutationFailed { operation: &'static str },

    #[error("A node with uri {0} already exists")]
    DuplicateUri(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: Option<String>,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Neo4jSettings::default().into()
    }
}

impl From<Neo4jSettings> for GraphConfig {
    fn from(settings: Neo4jSettings) -> Self {
        Self {
            uri: settings.uri,
            user: settings.user,
            password: settings.password,
            database: settings.database,
            max_connections: settings.max_connections,
            fetch_size: settings.fetch_size,
        }
    }
}

/// Thread-safe Neo4j client with connection pooling.
///
/// Every statement checks a connection out of the pool for its own duration.
/// Clone is cheap (inner Arc); the pool closes when the last clone drops.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size);
        if let Some(db) = &config.database {
            builder = builder.db(db.as_str());
        }
        let neo_config = builder
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, database = ?config.database, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Get a reference to the underlying neo4rs Graph for direct operations.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }
}

#[async_trait]
impl QueryExecutor for GraphClient {
    async fn execute(&self, query: CypherQuery) -> Result<Vec<Record>, GraphError> {
        tracing::debug!(cypher = %query.text(), "Executing statement");
        let mut stream = self.graph.execute(to_bolt_query(&query)).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row_to_record(&row)?);
        }
        query.check_rows(&rows)?;
        Ok(rows)
    }

    async fn execute_atomic(
        &self,
        queries: Vec<CypherQuery>,
    ) -> Result<Vec<Vec<Record>>, GraphError> {
        let mut txn = self.graph.start_txn().await?;
        let mut results = Vec::with_capacity(queries.len());

        for query in &queries {
            tracing::debug!(cypher = %query.text(), "Executing statement in transaction");
            let outcome = async {
                let mut stream = txn.execute(to_bolt_query(query)).await?;
                let mut rows = Vec::new();
                while let Some(row) = stream.next(txn.handle()).await? {
                    rows.push(row_to_record(&row)?);
                }
                query.check_rows(&rows)?;
                Ok::<_, GraphError>(rows)
            }
            .await;

            match outcome {
                Ok(rows) => results.push(rows),
                Err(e) => {
                    tracing::warn!(error = %e, statements = queries.len(), "Rolling back transaction");
                    if let Err(rollback) = txn.rollback().await {
                        tracing::warn!(error = %rollback, "Rollback failed");
                    }
                    return Err(e);
                }
            }
        }

        txn.commit().await?;
        Ok(results)
    }
}

// ── Bolt conversion ──────────────────────────────────────────────

fn to_bolt_query(query: &CypherQuery) -> Query {
    query
        .parameters()
        .iter()
        .fold(neo4rs::query(query.text()), |q, (key, value)| {
            q.param(key, json_to_bolt(value))
        })
}

/// Convert a JSON parameter into the driver's wire type.
fn json_to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) => BoltType::List(BoltList {
            value: items.iter().map(json_to_bolt).collect(),
        }),
        Value::Object(map) => BoltType::Map(BoltMap {
            value: map
                .iter()
                .map(|(k, v)| (BoltString::from(k.as_str()), json_to_bolt(v)))
                .collect(),
        }),
    }
}

fn row_to_record(row: &neo4rs::Row) -> Result<Record, GraphError> {
    let columns: Properties = row
        .to()
        .map_err(|e| GraphError::Serialization(format!("Failed to read row: {e}")))?;
    Ok(Record::new(columns))
}

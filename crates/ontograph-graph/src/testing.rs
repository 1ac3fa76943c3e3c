//! Scripted in-memory executor for unit tests.
//!
//! Responses are queued per statement and consumed in order; once the queue
//! is empty every statement returns no rows. Every statement is logged.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::client::GraphError;
use crate::executor::{CypherQuery, QueryExecutor, Record};

/// Outcome of one `execute_atomic` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub statements: usize,
    pub committed: bool,
}

#[derive(Default)]
pub struct MockExecutor {
    responses: Mutex<VecDeque<Result<Vec<Record>, GraphError>>>,
    log: Mutex<Vec<CypherQuery>>,
    batches: Mutex<Vec<Batch>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result set for the next statement.
    pub fn push_rows(&self, rows: Vec<Record>) {
        lock(&self.responses).push_back(Ok(rows));
    }

    /// Queue a failure for the next statement.
    pub fn push_error(&self, error: GraphError) {
        lock(&self.responses).push_back(Err(error));
    }

    /// Every statement executed so far, in order.
    pub fn queries(&self) -> Vec<CypherQuery> {
        lock(&self.log).clone()
    }

    pub fn batches(&self) -> Vec<Batch> {
        lock(&self.batches).clone()
    }

    fn respond(&self, query: &CypherQuery) -> Result<Vec<Record>, GraphError> {
        lock(&self.log).push(query.clone());
        let rows = lock(&self.responses).pop_front().unwrap_or(Ok(Vec::new()))?;
        query.check_rows(&rows)?;
        Ok(rows)
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    async fn execute(&self, query: CypherQuery) -> Result<Vec<Record>, GraphError> {
        self.respond(&query)
    }

    async fn execute_atomic(
        &self,
        queries: Vec<CypherQuery>,
    ) -> Result<Vec<Vec<Record>>, GraphError> {
        let mut results = Vec::with_capacity(queries.len());
        for query in &queries {
            match self.respond(query) {
                Ok(rows) => results.push(rows),
                Err(e) => {
                    lock(&self.batches).push(Batch {
                        statements: queries.len(),
                        committed: false,
                    });
                    return Err(e);
                }
            }
        }
        lock(&self.batches).push(Batch {
            statements: queries.len(),
            committed: true,
        });
        Ok(results)
    }
}

/// A record from a JSON object literal. Non-objects yield an empty record.
pub fn row(value: Value) -> Record {
    Record::new(value.as_object().cloned().unwrap_or_default())
}

/// A record shaped like the standard node projection.
pub fn node_row(uri: &str, title: &str, labels: &[&str]) -> Record {
    row(serde_json::json!({
        "element_id": format!("4:mock:{uri}"),
        "labels": labels,
        "uri": uri,
        "title": title,
        "description": "",
    }))
}

/// `base` with the columns of `extra` added (or replaced).
pub fn merge(base: Record, extra: Value) -> Record {
    let mut columns = base.into_inner();
    if let Value::Object(more) = extra {
        columns.extend(more);
    }
    Record::new(columns)
}

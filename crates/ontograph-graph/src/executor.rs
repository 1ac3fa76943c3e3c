//! The query-execution boundary: parameterized Cypher in, materialized rows out.

use async_trait::async_trait;
use serde_json::Value;

use ontograph_core::Properties;

use crate::client::GraphError;

/// A parameterized Cypher statement.
///
/// Dynamic values always travel in `params`; only sanitized labels and
/// relationship types are ever spliced into `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct CypherQuery {
    text: String,
    params: Properties,
    required: Option<&'static str>,
}

impl CypherQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Properties::new(),
            required: None,
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn params(mut self, params: Properties) -> Self {
        self.params.extend(params);
        self
    }

    /// Mark the statement as a mutation that must return at least one row.
    /// Executors fail it with [`GraphError::MutationFailed`] otherwise.
    pub fn required(mut self, operation: &'static str) -> Self {
        self.required = Some(operation);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parameters(&self) -> &Properties {
        &self.params
    }

    pub fn requirement(&self) -> Option<&'static str> {
        self.required
    }

    /// Apply the `required` contract to a finished result set.
    pub fn check_rows(&self, rows: &[Record]) -> Result<(), GraphError> {
        match self.required {
            Some(operation) if rows.is_empty() => Err(GraphError::MutationFailed { operation }),
            _ => Ok(()),
        }
    }
}

/// One result row: column alias → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(Properties);

impl Record {
    pub fn new(columns: Properties) -> Self {
        Self(columns)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column).filter(|v| !v.is_null())
    }

    /// String column; missing or null reads as empty.
    pub fn get_string(&self, column: &str) -> String {
        match self.get(column) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    pub fn get_i64(&self, column: &str) -> i64 {
        self.get(column).and_then(Value::as_i64).unwrap_or(0)
    }

    pub fn get_strings(&self, column: &str) -> Vec<String> {
        match self.get(column) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// List-of-maps column (e.g. the result of `collect({...})`).
    pub fn get_records(&self, column: &str) -> Vec<Record> {
        match self.get(column) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_object().cloned().map(Record))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn columns(&self) -> &Properties {
        &self.0
    }

    pub fn into_inner(self) -> Properties {
        self.0
    }
}

impl From<Properties> for Record {
    fn from(columns: Properties) -> Self {
        Self(columns)
    }
}

/// Anything that can run Cypher against a property-graph store.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run one statement and materialize every row.
    async fn execute(&self, query: CypherQuery) -> Result<Vec<Record>, GraphError>;

    /// Run all statements, in order, inside one store transaction.
    ///
    /// Commits only when every statement succeeds and every `required`
    /// statement returned a row; otherwise rolls back and returns the error.
    async fn execute_atomic(
        &self,
        queries: Vec<CypherQuery>,
    ) -> Result<Vec<Vec<Record>>, GraphError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::new(value.as_object().cloned().unwrap())
    }

    #[test]
    fn record_accessors_default_on_missing_and_null() {
        let row = record(json!({"uri": "class_a", "title": null, "count": 3}));
        assert_eq!(row.get_string("uri"), "class_a");
        assert_eq!(row.get_string("title"), "");
        assert_eq!(row.get_string("missing"), "");
        assert_eq!(row.get_i64("count"), 3);
        assert_eq!(row.get_i64("uri"), 0);
        assert!(row.get("title").is_none());
    }

    #[test]
    fn record_nested_lists() {
        let row = record(json!({
            "labels": ["Class", 7, "Imported"],
            "arcs": [{"element_id": "5:x:1"}, "junk", {"element_id": null}]
        }));
        assert_eq!(row.get_strings("labels"), vec!["Class", "Imported"]);
        let arcs = row.get_records("arcs");
        assert_eq!(arcs.len(), 2);
        assert_eq!(arcs[0].get_string("element_id"), "5:x:1");
        assert_eq!(arcs[1].get_string("element_id"), "");
    }

    #[test]
    fn required_query_fails_on_empty_rows() {
        let q = CypherQuery::new("MATCH (n) RETURN n").required("create_arc");
        assert!(matches!(
            q.check_rows(&[]),
            Err(GraphError::MutationFailed {
                operation: "create_arc"
            })
        ));
        assert!(q.check_rows(&[Record::default()]).is_ok());
        assert!(CypherQuery::new("RETURN 1").check_rows(&[]).is_ok());
    }

    #[test]
    fn params_accumulate() {
        let q = CypherQuery::new("RETURN $a, $b")
            .param("a", 1)
            .param("b", "two");
        assert_eq!(q.parameters()["a"], json!(1));
        assert_eq!(q.parameters()["b"], json!("two"));
        assert_eq!(q.requirement(), None);
    }
}

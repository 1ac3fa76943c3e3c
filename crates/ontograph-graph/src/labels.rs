//! Escaping for labels and relationship types spliced into Cypher text.
//!
//! Cypher cannot bind labels or relationship types as parameters, so these
//! are the only user-supplied strings that reach query text. Each one is
//! wrapped in backticks with embedded backticks doubled.

/// Quote a single identifier: `` User`Test `` becomes ``` `User``Test` ```.
pub fn escape_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Build a label clause such as `` :`User`:`Person` ``. Empty input yields an
/// empty clause.
pub fn escape_labels<S: AsRef<str>>(labels: &[S]) -> String {
    labels
        .iter()
        .map(|label| format!(":{}", escape_identifier(label.as_ref())))
        .collect()
}

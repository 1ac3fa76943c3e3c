//! Command-line surface.

use clap::{Parser, Subcommand};

use ontograph_core::config::DEFAULT_FILE_PREFIX;

#[derive(Parser, Debug)]
#[command(name = "ontograph")]
#[command(about = "Manage an ontology stored in a Neo4j property graph")]
pub struct Cli {
    /// Config file prefix (reads `<prefix>.toml` if present).
    #[arg(short, long, global = true, default_value = DEFAULT_FILE_PREFIX)]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create uri uniqueness constraints for every ontology label.
    Bootstrap,
    /// Node and arc counts.
    Stats,
    /// Delete every node and arc in the database.
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// List nodes, optionally filtered by label.
    Nodes {
        #[arg(long = "label")]
        labels: Vec<String>,
        /// Include each node's outgoing arcs.
        #[arg(long, conflicts_with = "labels")]
        with_arcs: bool,
    },
    /// Show any node by uri.
    Node { uri: String },
    /// List root classes.
    Roots,
    /// Run a raw Cypher statement.
    Query {
        cypher: String,
        /// Parameters as a JSON object.
        #[arg(long)]
        params: Option<String>,
    },
    /// Seed a small example ontology.
    Demo,
    #[command(subcommand)]
    Class(ClassCommand),
    #[command(subcommand)]
    Object(ObjectCommand),
}

#[derive(Subcommand, Debug)]
pub enum ClassCommand {
    /// Show a class with its signature.
    Show { uri: String },
    Create {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        parent: Option<String>,
    },
    Update {
        uri: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a class, its descendants, and all their objects.
    Delete { uri: String },
    Children { uri: String },
    Parents { uri: String },
    Objects { uri: String },
    Signature { uri: String },
    AddParent { uri: String, parent: String },
    AddAttribute {
        uri: String,
        name: String,
        #[arg(long)]
        attr_uri: Option<String>,
    },
    AddObjectAttribute {
        uri: String,
        name: String,
        range: String,
    },
    RemoveAttribute { uri: String, attr_uri: String },
    RemoveObjectAttribute { attr_uri: String },
}

#[derive(Subcommand, Debug)]
pub enum ObjectCommand {
    /// Show an object with its class and attribute values.
    Show { uri: String },
    Create {
        class_uri: String,
        /// Title, description, and attribute values as a JSON object.
        #[arg(long)]
        data: Option<String>,
    },
    /// Replace an object's title, description, and attribute values.
    Update { uri: String, data: String },
    Delete { uri: String },
    Properties { uri: String },
}

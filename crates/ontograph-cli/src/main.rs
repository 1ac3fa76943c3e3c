//! CLI entry point for the ontograph ontology tool.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use ontograph_core::Settings;
use ontograph_graph::GraphConfig;
use ontograph_ontology::OntologyRepository;

use ontograph_cli::cli::Cli;
use ontograph_cli::commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;

    let graph_config = GraphConfig::from(settings.neo4j.clone());
    let repo = OntologyRepository::connect(&graph_config, &settings.ontology).await?;
    tracing::info!(uri = %graph_config.uri, "Connected to Neo4j");

    let result = commands::execute(&repo, cli.command).await;
    repo.close();

    let output = result?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

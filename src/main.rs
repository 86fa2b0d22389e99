//! oasdoc CLI entrypoint
//! Parses command-line arguments and dispatches to the document pipeline.
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use oasdoc::{
    extract_operations, render_api_info, resolve, synthesize_example, ApiDocument,
    CompositeDocumentLoader, DocumentLoader,
};

#[derive(Parser)]
#[command(name = "oasdoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Print a human-readable report of every operation in a document
    Inspect {
        /// Path or URL to the Swagger/OpenAPI document (YAML or JSON)
        #[arg(long)]
        schema_path: String,
    },
    /// Print the document with all schema references resolved
    Resolve {
        /// Path or URL to the Swagger/OpenAPI document (YAML or JSON)
        #[arg(long)]
        schema_path: String,
        /// Emit compact instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },
    /// Synthesize an example payload for one named schema definition
    Example {
        /// Path or URL to the Swagger/OpenAPI document (YAML or JSON)
        #[arg(long)]
        schema_path: String,
        /// Name of the definition (e.g. "Pet")
        #[arg(long)]
        schema: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Inspect { schema_path } => inspect(schema_path).await?,
        Commands::Resolve {
            schema_path,
            compact,
        } => resolve_document(schema_path, *compact).await?,
        Commands::Example {
            schema_path,
            schema,
        } => example(schema_path, schema).await?,
    }
    Ok(())
}

async fn load(schema_path: &str) -> anyhow::Result<ApiDocument> {
    info!(source = %schema_path, "Loading API document");
    CompositeDocumentLoader::new()
        .load(schema_path)
        .await
        .with_context(|| format!("Failed to load document from {schema_path}"))
}

async fn inspect(schema_path: &str) -> anyhow::Result<()> {
    let doc = load(schema_path).await?;
    let resolved = resolve(&doc);
    let operations = extract_operations(&resolved);
    info!(count = operations.len(), "Extracted operations");
    print!("{}", render_api_info(&resolved));
    Ok(())
}

async fn resolve_document(schema_path: &str, compact: bool) -> anyhow::Result<()> {
    let doc = load(schema_path).await?;
    let resolved = resolve(&doc);
    let output = if compact {
        serde_json::to_string(resolved.json())?
    } else {
        serde_json::to_string_pretty(resolved.json())?
    };
    println!("{output}");
    Ok(())
}

async fn example(schema_path: &str, schema_name: &str) -> anyhow::Result<()> {
    let doc = load(schema_path).await?;
    let definitions = doc.definitions();
    let schema = definitions
        .get(schema_name)
        .with_context(|| format!("No definition named '{schema_name}' in {schema_path}"))?;

    let example = synthesize_example(schema, &definitions);
    println!("{}", serde_json::to_string_pretty(&example)?);
    Ok(())
}

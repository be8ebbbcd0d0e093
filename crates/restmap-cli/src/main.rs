//! restmap command-line tool
//!
//! Encodes queries into REST query paths and decodes paths back into
//! queries, against a JSON schema file.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use restmap_core::Catalog;

/// restmap query path tool
#[derive(Parser, Debug)]
#[command(name = "restmap")]
#[command(version, about = "Encode and decode REST query paths")]
pub struct Args {
    /// Schema file (JSON catalog of entities)
    #[arg(short, long, global = true, default_value = "schema.json")]
    pub schema: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a query into a path
    Encode {
        /// Entity name
        #[arg(short, long)]
        model: String,

        /// Query file (JSON)
        #[arg(short, long)]
        query: Option<PathBuf>,

        /// Viewed fields
        #[arg(short, long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Decode a path into a query
    Decode {
        /// Entity name
        #[arg(short, long)]
        model: String,

        /// Query path
        path: String,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// List the entities of the schema
    Models,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let schema = std::fs::read_to_string(&args.schema)
        .with_context(|| format!("failed to read schema {}", args.schema.display()))?;
    let catalog = Catalog::from_json(&schema)
        .with_context(|| format!("invalid schema {}", args.schema.display()))?;
    tracing::debug!(entities = catalog.entity_names().len(), "loaded schema");

    let output = match args.command {
        Command::Encode {
            model,
            query,
            fields,
        } => {
            let query = match query {
                Some(file) => Some(
                    std::fs::read_to_string(&file)
                        .with_context(|| format!("failed to read query {}", file.display()))?,
                ),
                None => None,
            };
            commands::encode(&catalog, &model, query.as_deref(), &fields)?
        }
        Command::Decode {
            model,
            path,
            compact,
        } => commands::decode(&catalog, &model, &path, !compact)?,
        Command::Models => commands::models(&catalog),
    };

    println!("{}", output);
    Ok(())
}

//! Schemalink CLI
//!
//! Answers join-path questions about a schema snapshot stored as JSON or TOML.
//!
//! ```text
//! schemalink --schema db.json path user role
//! schemalink --schema db.toml --config costs.toml --json path role right
//! schemalink --schema db.json junctions --ignore-referenced
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `warn`); results go to stdout.
//! The exit code is 1 when the query fails.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use schemalink_analyzer::{AnalyzerConfig, FileSchemaProvider, MemoCache, SchemaAnalyzer};
use std::path::PathBuf;
use std::sync::Arc;

mod command;

use command::{CommandAction, CommandHandler};

#[derive(Parser, Debug)]
#[command(name = "schemalink", version, about = "Find join paths between tables of a schema")]
struct Cli {
    /// Schema snapshot (.json or .toml)
    #[arg(long, short = 's')]
    schema: PathBuf,

    /// Analyzer settings: cache and cost overrides (.json or .toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Print a JSON response envelope instead of plain text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cheapest foreign key chain between two tables
    Path { from: String, to: String },
    /// List junction (many-to-many) tables
    Junctions {
        /// Skip junction tables referenced by another table
        #[arg(long)]
        ignore_referenced: bool,
    },
    /// Inheritance foreign key of a table
    Parent { table: String },
    /// Inheritance foreign keys pointing at a table
    Children { table: String },
}

impl From<Command> for CommandAction {
    fn from(command: Command) -> Self {
        match command {
            Command::Path { from, to } => Self::Path { from, to },
            Command::Junctions { ignore_referenced } => Self::Junctions { ignore_referenced },
            Command::Parent { table } => Self::Parent { table },
            Command::Children { table } => Self::Children { table },
        }
    }
}

fn build_analyzer(cli: &Cli) -> Result<SchemaAnalyzer<FileSchemaProvider>> {
    let config = match &cli.config {
        Some(path) => AnalyzerConfig::load(path)
            .with_context(|| format!("invalid config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    let cache = match config.cache {
        Some(cache) => MemoCache::new(cache)?,
        None => MemoCache::disabled(),
    };
    let mut analyzer =
        SchemaAnalyzer::with_cache(FileSchemaProvider::new(&cli.schema), Arc::new(cache));
    analyzer.set_costs(config.costs)?;
    Ok(analyzer)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let handler = CommandHandler::new(build_analyzer(&cli)?);
    let response = handler.execute(&CommandAction::from(cli.command));

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if let Some(message) = &response.message {
        eprintln!("{message}");
        for hint in &response.hints {
            eprintln!("hint: {}", hint.text);
        }
    } else if !response.text.is_empty() {
        println!("{}", response.text);
    }

    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

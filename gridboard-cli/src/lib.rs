//! Argument parsing and command dispatch for the `gridboard` binary.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridboard_service::Services;
use gridboard_storage::{CallContext, Database, StorageConfig};
use gridboard_types::{DataSourceClass, DataSourceClassId};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gridboard")]
#[command(about = "Inspect and seed a gridboard dashboard database")]
pub struct Cli {
    /// Path to the SQLite database file (in-memory when omitted)
    #[arg(short, long, env = "GRIDBOARD_DB")]
    pub database: Option<PathBuf>,

    /// How long to wait on a locked database, in milliseconds
    #[arg(long, env = "GRIDBOARD_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    pub busy_timeout_ms: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create missing tables and print the schema version
    Migrate,
    /// Print every component as one JSON object per line
    Components,
    /// Print data sources as one JSON object per line
    DataSources {
        /// Only data sources of this class
        #[arg(long)]
        class: Option<String>,
    },
    /// Print every data source class as one JSON object per line
    Classes,
    /// Register the data source classes listed in a JSON array file
    ImportClasses { file: PathBuf },
}

impl Cli {
    #[must_use]
    pub fn storage_config(&self) -> StorageConfig {
        let config = match &self.database {
            Some(path) => StorageConfig::file(path),
            None => StorageConfig::in_memory(),
        };
        config.with_busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }
}

/// Runs `cli.command`, writing results to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = cli.storage_config();
    let db = Database::open(&config).with_context(|| match &config.path {
        Some(path) => format!("Failed to open database at {}", path.display()),
        None => "Failed to open in-memory database".to_owned(),
    })?;
    let services = Services::new(db.clone());
    let ctx = CallContext::background();

    match &cli.command {
        Command::Migrate => {
            let version = db.schema_version(&ctx)?;
            writeln!(out, "schema version {version}")?;
        }
        Command::Components => write_lines(out, &services.components.list(&ctx)?)?,
        Command::DataSources { class: None } => {
            write_lines(out, &services.data_sources.list(&ctx)?)?;
        }
        Command::DataSources { class: Some(class) } => {
            let class_id = DataSourceClassId::new(class.as_str());
            write_lines(out, &services.data_sources.list_by_class(&ctx, &class_id)?)?;
        }
        Command::Classes => write_lines(out, &services.classes.list(&ctx)?)?,
        Command::ImportClasses { file } => {
            let text = fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let classes: Vec<DataSourceClass> = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse classes in {}", file.display()))?;
            for class in &classes {
                services
                    .classes
                    .register(&ctx, class)
                    .with_context(|| format!("Failed to register class {}", class.id))?;
            }
            info!(count = classes.len(), "Imported data source classes");
            writeln!(out, "imported {} classes", classes.len())?;
        }
    }
    Ok(())
}

fn write_lines<T: Serialize>(out: &mut impl Write, items: &[T]) -> Result<()> {
    for item in items {
        serde_json::to_writer(&mut *out, item)?;
        writeln!(out)?;
    }
    Ok(())
}

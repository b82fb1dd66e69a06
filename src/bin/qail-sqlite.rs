//! qail-sqlite: compile QAIL query and schema trees to SQLite.
//!
//! # Usage
//!
//! ```bash
//! # Compile a SELECT from a JSON query tree
//! qail-sqlite select query.json
//!
//! # Bulk DELETE, tree read from stdin, JSON output
//! cat query.json | qail-sqlite --format json delete-all -
//!
//! # Inspect a RETURNING hint
//! qail-sqlite returning 'INSERT INTO "m" ("x") VALUES (?1) ;--RETURNING ON INSERT "m","id"'
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use qail_sqlite::config::{CliConfig, OutputFormat};
use qail_sqlite::prelude::*;
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qail-sqlite")]
#[command(version)]
#[command(about = "Compile QAIL query and schema trees to SQLite SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    qail-sqlite select query.json
    qail-sqlite --format json update-all query.json
    qail-sqlite ddl create_posts.json
    cat query.json | qail-sqlite delete-all -")]
struct Cli {
    /// Config file (default: $CONFIG_DIR/qail-sqlite/config.toml)
    #[arg(short, long, env = "QAIL_SQLITE_CONFIG")]
    config: Option<PathBuf>,

    /// Output format, overrides the config file
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Don't print bound parameters
    #[arg(long)]
    no_params: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query tree as SELECT
    Select {
        /// JSON file, or `-` for stdin
        input: String,
    },
    /// Compile a query tree as a bulk UPDATE
    UpdateAll {
        /// JSON file, or `-` for stdin
        input: String,
    },
    /// Compile a query tree as a bulk DELETE
    DeleteAll {
        /// JSON file, or `-` for stdin
        input: String,
    },
    /// Compile a schema change
    Ddl {
        /// JSON file, or `-` for stdin
        input: String,
    },
    /// Split a RETURNING hint off compiled SQL
    Returning {
        /// Compiled SQL text
        sql: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(format) = cli.format {
        config.format = format;
    }
    if cli.no_color {
        config.color = false;
    }
    if cli.no_params {
        config.show_params = false;
    }
    if !config.color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Commands::Select { input } => {
            let query: Query = read_tree(input)?;
            print_compiled(&build_select(&query)?, &config)
        }
        Commands::UpdateAll { input } => {
            let query: Query = read_tree(input)?;
            print_compiled(&build_update_all(&query)?, &config)
        }
        Commands::DeleteAll { input } => {
            let query: Query = read_tree(input)?;
            print_compiled(&build_delete_all(&query)?, &config)
        }
        Commands::Ddl { input } => {
            let change: SchemaChange = read_tree(input)?;
            print_compiled(&change.to_sql()?, &config)
        }
        Commands::Returning { sql } => print_returning(sql, &config),
    }
}

/// Deserialize a tree from a JSON file or stdin.
fn read_tree<T: DeserializeOwned>(input: &str) -> Result<T> {
    let content = if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
    };
    serde_json::from_str(&content).with_context(|| format!("Invalid tree in {}", input))
}

fn print_compiled(compiled: &CompiledSql, config: &CliConfig) -> Result<()> {
    match config.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(compiled)?);
        }
        OutputFormat::Text => {
            println!("{}", compiled.sql.white());
            if config.show_params && !compiled.params.is_empty() {
                println!();
                println!("{}", "Parameters:".cyan());
                for (i, value) in compiled.params.iter().enumerate() {
                    println!("  ?{} = {}", i + 1, value.to_string().yellow());
                }
            }
        }
    }
    Ok(())
}

fn print_returning(sql: &str, config: &CliConfig) -> Result<()> {
    let (statement, hint) = split_returning(sql)?;
    match config.format {
        OutputFormat::Json => {
            let out = serde_json::json!({ "statement": statement, "returning": hint });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{}", statement.white());
            match hint {
                Some(hint) => {
                    let table = match &hint.prefix {
                        Some(prefix) => format!("{}.{}", prefix, hint.table),
                        None => hint.table.clone(),
                    };
                    println!();
                    println!(
                        "{} {} on {}",
                        "Re-fetch after".cyan(),
                        hint.operation.to_string().bold(),
                        table.green()
                    );
                    println!("  {}", hint.columns.join(", ").yellow());
                }
                None => println!("{}", "(no RETURNING hint)".dimmed()),
            }
        }
    }
    Ok(())
}

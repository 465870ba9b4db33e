//! # GCL CLI
//!
//! Command-line interface for the GCL interval query engine.
//!
//! ## Commands
//!
//! - `gcl query <corpus> <expr>` - Run one query over a text file
//! - `gcl batch <corpus> <queries>` - Run a file of queries, one per line
//! - `gcl explain <expr>` - Show how a query parses
//! - `gcl stats <corpus>` - Show index statistics for a text file
//!
//! ## Example Usage
//!
//! ```bash
//! # Every span from "cat" to the next "mat"
//! gcl query story.txt "'cat' .. 'mat'"
//!
//! # Spans from "the" to a full stop that hold the phrase "black cat"
//! gcl query story.txt "%1 .. '.' > %2" -a the -a "black,cat"
//!
//! # Check operator precedence
//! gcl explain "'a' + 'b' ^ 'c' < [10]"
//! ```

mod app;
mod commands;

use clap::{Parser, Subcommand};
use gcl_core::Position;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// GCL - Structural search over token positions
#[derive(Parser)]
#[command(name = "gcl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query over a text corpus
    Query {
        /// Text file to index
        corpus: PathBuf,

        /// Query expression
        expression: String,

        /// Value for the next %N parameter (integer, token, or comma-separated phrase; quote a number to use it as a token)
        #[arg(short, long = "arg")]
        args: Vec<String>,

        /// Scan backward from the end of the corpus
        #[arg(short, long)]
        reverse: bool,

        /// Start scanning at this position
        #[arg(long, allow_negative_numbers = true)]
        from: Option<Position>,

        /// Maximum number of results to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Run every query in a file (one per line, `#` starts a comment)
    Batch {
        /// Text file to index
        corpus: PathBuf,

        /// File of query expressions
        queries: PathBuf,

        /// Maximum number of results per query
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Show the fully parenthesized form of a query
    Explain {
        /// Query expression
        expression: String,
    },

    /// Show index statistics for a text corpus
    Stats {
        /// Text file to index
        corpus: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => gcl_core::Config::load_from(path)?,
        None => gcl_core::Config::load()?,
    };

    // Setup logging
    let log_level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.general.log_level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    // Execute command
    match cli.command {
        Commands::Query {
            corpus,
            expression,
            args,
            reverse,
            from,
            limit,
            output,
        } => commands::query::run(
            config,
            &corpus,
            &expression,
            &args,
            reverse,
            from,
            limit,
            output,
        ),
        Commands::Batch {
            corpus,
            queries,
            limit,
            output,
        } => commands::batch::run(config, &corpus, &queries, limit, output),
        Commands::Explain { expression } => commands::explain::run(&expression),
        Commands::Stats { corpus, output } => commands::stats::run(config, &corpus, output),
    }
}

//! CLI commands and argument parsing

use crate::types::SortOrder;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keyset pagination over DuckDB tables
#[derive(Parser, Debug)]
#[command(name = "seekpage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Table selection shared by the paging commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// DuckDB database file
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Table to read
    #[arg(short, long)]
    pub table: Option<String>,

    /// Row filter as field=value (repeatable; `field=null` matches NULL)
    #[arg(short = 'w', long = "where", value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Columns to return (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub select: Vec<String>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a cursor token
    Encode {
        /// Pagination key field
        #[arg(short, long, default_value = "id")]
        key: String,

        /// Key value (JSON scalar, bare words are strings)
        #[arg(long)]
        value: String,
    },

    /// Decode a cursor token
    Decode {
        /// Cursor token
        token: String,
    },

    /// Fetch one cursor page
    Page {
        #[command(flatten)]
        table: TableArgs,

        /// Pagination key field
        #[arg(short, long)]
        key: Option<String>,

        /// Return rows after this cursor
        #[arg(long, conflicts_with = "before")]
        after: Option<String>,

        /// Return rows before this cursor
        #[arg(long)]
        before: Option<String>,

        /// Page size
        #[arg(short, long)]
        limit: Option<usize>,

        /// Sort order (asc or desc)
        #[arg(short, long, value_parser = parse_order)]
        order: Option<SortOrder>,
    },

    /// Fetch one numbered page
    Offset {
        #[command(flatten)]
        table: TableArgs,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Page size
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Column to order by
        #[arg(long)]
        order_by: Option<String>,

        /// Sort order (asc or desc)
        #[arg(short, long, value_parser = parse_order)]
        order: Option<SortOrder>,

        /// Skip the total count
        #[arg(long)]
        skip_count: bool,
    },
}

fn parse_order(s: &str) -> Result<SortOrder, String> {
    s.parse().map_err(|e: crate::Error| e.to_string())
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}

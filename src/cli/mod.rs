//! CLI module
//!
//! Command-line interface for cursors and table pages.
//!
//! # Commands
//!
//! - `encode` - Build a cursor token from a key and value
//! - `decode` - Show the payload of a cursor token
//! - `page` - Fetch one cursor page from a DuckDB table
//! - `offset` - Fetch one numbered page from a DuckDB table

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, TableArgs};
pub use runner::Runner;

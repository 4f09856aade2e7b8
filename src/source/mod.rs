//! Data source module
//!
//! The fetch contract the paginators run against, plus an in-memory store.
//!
//! # Overview
//!
//! A [`DataSource`] exposes two operations:
//! - `find_many`: filtered, ordered, cursor-seekable, bounded fetch
//! - `count`: number of rows matching a filter
//!
//! Any store that can do a key-range scan satisfies the contract. The
//! DuckDB-backed implementation lives in [`crate::database`].

mod memory;
mod types;

pub use memory::{compare_values, MemorySource};
pub use types::{DataSource, FindManyArgs, OrderBy, PageRecord, SeekCursor};

// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # seekpage
//!
//! Keyset (cursor) pagination over ordered collections.
//!
//! ## Features
//!
//! - **Cursor Pagination**: Forward and backward pages with opaque, versioned cursors
//! - **Offset Pagination**: Page-number listings with total counts
//! - **Pluggable Stores**: Any [`DataSource`](source::DataSource) can be paged
//! - **DuckDB Tables**: Page through a DuckDB table with bound-parameter SQL
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use seekpage::pagination::{build_paginator, PaginateArgs, PaginationOptions, PagingQuery};
//! use seekpage::source::MemorySource;
//! use seekpage::{Filter, SortOrder};
//!
//! #[tokio::main]
//! async fn main() -> seekpage::Result<()> {
//!     let users: MemorySource = (1..=25).map(|id| serde_json::json!({ "id": id })).collect();
//!
//!     let query = PagingQuery::first(10).with_order(SortOrder::Asc);
//!     let page = build_paginator(PaginationOptions::new(query))?
//!         .paginate(&users, PaginateArgs::new(Filter::new()))
//!         .await?;
//!
//!     // Follow the after cursor for the next page
//!     let next = PagingQuery::after(page.cursor.after_cursor.unwrap(), 10);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            users::UserRepository / seekpage CLI          │
//! └──────────────────────────────────────────────────────────┘
//!                │                           │
//! ┌──────────────┴───────────┐   ┌───────────┴──────────────┐
//! │ listing (cursor + count) │   │ offset (page + count)    │
//! └──────────────────────────┘   └──────────────────────────┘
//!                │                           │
//! ┌──────────────┴───────────┐               │
//! │ pagination::Paginator    │── cursor ──┐  │
//! └──────────────────────────┘            │  │
//!                │                        │  │
//! ┌──────────────┴────────────────────────┴──┴───────────────┐
//! │       source::DataSource  (MemorySource, DuckDbSource)   │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Cursor token encoding
pub mod cursor;

/// Data source contract and in-memory store
pub mod source;

/// Cursor paginator
pub mod pagination;

/// Offset pagination
pub mod offset;

/// Caller-facing cursor listings
pub mod listing;

/// User repository
pub mod users;

/// DuckDB table source
pub mod database;

/// CLI configuration file
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use cursor::Cursor;
pub use pagination::{build_paginator, Paginator, PagingQuery, PagingResult};
pub use source::{DataSource, FindManyArgs, PageRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

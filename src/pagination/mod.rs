//! Pagination module
//!
//! Cursor (keyset) pagination over any [`DataSource`](crate::source::DataSource).
//!
//! # Overview
//!
//! A [`Paginator`] is built per request, configured with an optional
//! after- or before-cursor, a limit and an order, and then run once. It
//! fetches `limit + 1` rows to learn whether more data exists, reverses
//! backward seeks back into logical order, and returns the page with
//! cursors for whichever edges have more rows behind them.
//!
//! ```rust,ignore
//! let paginator = build_paginator(PaginationOptions::new(PagingQuery::first(10)))?;
//! let page = paginator.paginate(&source, PaginateArgs::default()).await?;
//! if let Some(next) = page.cursor.after_cursor {
//!     // feed `next` back as `after_cursor`
//! }
//! ```

mod paginator;
mod types;

pub use paginator::{build_paginator, Paginator};
pub use types::{
    CursorPair, PaginateArgs, PaginationOptions, PaginatorConfig, PagingQuery, PagingResult,
    DEFAULT_LIMIT,
};

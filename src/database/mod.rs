//! DuckDB table support
//!
//! Exposes a DuckDB table as a [`DataSource`](crate::source::DataSource) so
//! the cursor and offset paginators can run against real SQL.

mod engine;

pub use engine::{DuckDbSource, SqlQuery};

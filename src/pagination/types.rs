//! Pagination request and result types

use crate::types::{Filter, PaginationKey, Projection, SortOrder};
use serde::{Deserialize, Serialize};

/// Default page size of a bare [`Paginator`](super::Paginator)
pub const DEFAULT_LIMIT: usize = 100;

/// Request-side pagination parameters
///
/// `after_cursor` and `before_cursor` are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingQuery {
    /// Resume after this cursor (forward)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_cursor: Option<String>,
    /// Resume before this cursor (backward)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_cursor: Option<String>,
    /// Page size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Logical order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

impl PagingQuery {
    /// First page with the given limit
    pub fn first(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Page after a cursor
    pub fn after(cursor: impl Into<String>, limit: usize) -> Self {
        Self {
            after_cursor: Some(cursor.into()),
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Page before a cursor
    pub fn before(cursor: impl Into<String>, limit: usize) -> Self {
        Self {
            before_cursor: Some(cursor.into()),
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Set the logical order
    #[must_use]
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }
}

/// Options for [`build_paginator`](super::build_paginator)
#[derive(Debug, Clone, Default)]
pub struct PaginationOptions {
    /// Request parameters
    pub query: PagingQuery,
    /// Ordering and seek key (defaults to `id`)
    pub pagination_key: PaginationKey,
}

impl PaginationOptions {
    /// Options for a query over the default `id` key
    pub fn new(query: PagingQuery) -> Self {
        Self {
            query,
            pagination_key: PaginationKey::default(),
        }
    }

    /// Use another pagination key
    #[must_use]
    pub fn with_key(mut self, key: impl Into<PaginationKey>) -> Self {
        self.pagination_key = key.into();
        self
    }
}

/// Explicit paginator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatorConfig {
    /// Ordering and seek key
    pub key: PaginationKey,
    /// Page size
    pub limit: usize,
    /// Logical order
    pub order: SortOrder,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            key: PaginationKey::default(),
            limit: DEFAULT_LIMIT,
            order: SortOrder::Desc,
        }
    }
}

/// Per-call fetch arguments
#[derive(Debug, Clone, Default)]
pub struct PaginateArgs {
    /// Row filter
    pub filter: Filter,
    /// Logical order for this call (overrides the configured order)
    pub order: Option<SortOrder>,
    /// Returned fields
    pub projection: Option<Projection>,
}

impl PaginateArgs {
    /// Args with a filter
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    /// Set the logical order
    #[must_use]
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Restrict returned fields
    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(Projection::select(fields));
        self
    }

    /// Return named relations alongside scalar fields
    #[must_use]
    pub fn include<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(Projection::include(relations));
        self
    }
}

/// Cursors pointing past either edge of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPair {
    /// Set when more rows follow the last row
    pub after_cursor: Option<String>,
    /// Set when more rows precede the first row
    pub before_cursor: Option<String>,
}

/// One page of rows plus its cursors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagingResult<T> {
    /// Rows in logical order
    pub data: Vec<T>,
    /// Edge cursors
    pub cursor: CursorPair,
}

impl<T> PagingResult<T> {
    /// Empty page
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            cursor: CursorPair::default(),
        }
    }

    /// Whether a following page exists
    pub fn has_next(&self) -> bool {
        self.cursor.after_cursor.is_some()
    }

    /// Whether a preceding page exists
    pub fn has_previous(&self) -> bool {
        self.cursor.before_cursor.is_some()
    }

    /// Map rows to another type, keeping cursors
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PagingResult<U> {
        PagingResult {
            data: self.data.into_iter().map(f).collect(),
            cursor: self.cursor,
        }
    }
}

//! Caller-facing cursor listings
//!
//! Resolves a request against an explicit [`ListingConfig`], runs the
//! paginator and a total count side by side, and shapes the response the
//! transport layer renders.

use crate::error::{Error, Result};
use crate::pagination::{build_paginator, PaginateArgs, PaginationOptions, PagingQuery};
use crate::source::DataSource;
use crate::types::{Filter, PaginationKey, Projection, SortOrder};
use serde::{Deserialize, Serialize};

/// Listing defaults, passed explicitly by every caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Ordering and seek key
    #[serde(default)]
    pub pagination_key: PaginationKey,

    /// Page size when the request names none
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Largest page size a request may ask for
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Order when the request names none
    #[serde(default)]
    pub default_order: SortOrder,
}

fn default_limit() -> usize {
    10
}

fn default_max_limit() -> usize {
    100
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            pagination_key: PaginationKey::default(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            default_order: SortOrder::default(),
        }
    }
}

impl ListingConfig {
    /// Config over another key
    #[must_use]
    pub fn with_key(mut self, key: impl Into<PaginationKey>) -> Self {
        self.pagination_key = key.into();
        self
    }

    /// Fill in limit and order, clamp the limit, reject conflicting cursors
    pub fn resolve(&self, request: &PagingQuery) -> Result<PagingQuery> {
        let has_after = request.after_cursor.as_deref().is_some_and(|c| !c.is_empty());
        let has_before = request.before_cursor.as_deref().is_some_and(|c| !c.is_empty());
        if has_after && has_before {
            return Err(Error::ConflictingCursors);
        }

        let requested = request.limit.unwrap_or(self.default_limit);
        if requested == 0 {
            return Err(Error::InvalidLimit { limit: requested });
        }
        let limit = if requested > self.max_limit {
            tracing::warn!(
                requested,
                max = self.max_limit,
                "page size above maximum, clamping"
            );
            self.max_limit
        } else {
            requested
        };

        Ok(PagingQuery {
            after_cursor: request.after_cursor.clone().filter(|_| has_after),
            before_cursor: request.before_cursor.clone().filter(|_| has_before),
            limit: Some(limit),
            order: Some(request.order.unwrap_or(self.default_order)),
        })
    }
}

/// Cursor listing metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPaginationMeta {
    /// Rows matching the filter (not the page size)
    pub total_records: u64,
    /// Cursor for the following page
    pub after_cursor: Option<String>,
    /// Cursor for the preceding page
    pub before_cursor: Option<String>,
    /// Page size used
    pub limit: usize,
}

/// Cursor listing response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPaginated<T> {
    /// Rows in logical order
    pub data: Vec<T>,
    /// Metadata
    pub pagination: CursorPaginationMeta,
}

impl<T> CursorPaginated<T> {
    /// Map rows to another type, keeping metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> CursorPaginated<U> {
        CursorPaginated {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    /// Map rows with a fallible conversion
    pub fn try_map<U, F: FnMut(T) -> Result<U>>(self, f: F) -> Result<CursorPaginated<U>> {
        Ok(CursorPaginated {
            data: self.data.into_iter().map(f).collect::<Result<Vec<_>>>()?,
            pagination: self.pagination,
        })
    }
}

/// Run one cursor listing: page and total count, concurrently
pub async fn list_cursor<S>(
    source: &S,
    config: &ListingConfig,
    request: &PagingQuery,
    filter: Filter,
    projection: Option<Projection>,
) -> Result<CursorPaginated<S::Record>>
where
    S: DataSource + ?Sized,
{
    let query = config.resolve(request)?;
    let limit = query.limit.unwrap_or(config.default_limit);

    let paginator = build_paginator(
        PaginationOptions::new(query).with_key(config.pagination_key.clone()),
    )?;

    let args = PaginateArgs {
        filter: filter.clone(),
        order: None,
        projection,
    };

    let (page, total_records) =
        futures::try_join!(paginator.paginate(source, args), source.count(&filter))?;

    Ok(CursorPaginated {
        data: page.data,
        pagination: CursorPaginationMeta {
            total_records,
            after_cursor: page.cursor.after_cursor,
            before_cursor: page.cursor.before_cursor,
            limit,
        },
    })
}

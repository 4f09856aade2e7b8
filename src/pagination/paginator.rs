//! Keyset paginator
//!
//! Turns a directional request into one bounded fetch and the fetched rows
//! into a page plus edge cursors.

use super::types::{CursorPair, PaginateArgs, PaginationOptions, PaginatorConfig, PagingResult};
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::source::{DataSource, FindManyArgs, PageRecord, SeekCursor};
use crate::types::{PaginationKey, SortOrder};

/// Single-use cursor paginator over one pagination key
///
/// Configure with the setters, then call [`Paginator::paginate`] once.
#[derive(Debug, Clone)]
pub struct Paginator {
    key: PaginationKey,
    after: Option<Cursor>,
    before: Option<Cursor>,
    limit: usize,
    order: SortOrder,
}

impl Paginator {
    /// Create a paginator with the default limit (100) and order (desc)
    pub fn new(key: impl Into<PaginationKey>) -> Self {
        let defaults = PaginatorConfig::default();
        Self {
            key: key.into(),
            after: None,
            before: None,
            limit: defaults.limit,
            order: defaults.order,
        }
    }

    /// Create a paginator from an explicit configuration
    pub fn with_config(config: PaginatorConfig) -> Result<Self> {
        let mut paginator = Self::new(config.key);
        paginator.set_limit(config.limit)?;
        paginator.set_order(config.order);
        Ok(paginator)
    }

    /// Resume after a cursor token (forward seek)
    pub fn set_after_cursor(&mut self, token: &str) -> Result<()> {
        if self.before.is_some() {
            return Err(Error::ConflictingCursors);
        }
        self.after = Some(self.decode_for_key(token)?);
        Ok(())
    }

    /// Resume before a cursor token (backward seek)
    pub fn set_before_cursor(&mut self, token: &str) -> Result<()> {
        if self.after.is_some() {
            return Err(Error::ConflictingCursors);
        }
        self.before = Some(self.decode_for_key(token)?);
        Ok(())
    }

    /// Set the page size (at least 1)
    pub fn set_limit(&mut self, limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(Error::InvalidLimit { limit });
        }
        self.limit = limit;
        Ok(())
    }

    /// Set the logical order
    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
    }

    /// Pagination key
    pub fn key(&self) -> &PaginationKey {
        &self.key
    }

    /// Page size
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Configured logical order
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Decoded after-cursor, if set
    pub fn after_cursor(&self) -> Option<&Cursor> {
        self.after.as_ref()
    }

    /// Decoded before-cursor, if set
    pub fn before_cursor(&self) -> Option<&Cursor> {
        self.before.as_ref()
    }

    /// Build the fetch this paginator will issue
    ///
    /// Backward seeks run in the inverted order and are reversed afterwards.
    pub fn fetch_args(&self, args: &PaginateArgs) -> FindManyArgs {
        let logical = args.order.unwrap_or(self.order);
        let physical = if self.before.is_some() {
            logical.flip()
        } else {
            logical
        };

        let mut fetch = FindManyArgs::new(args.filter.clone())
            .take(self.limit.saturating_add(1))
            .order_by(self.key.as_str(), physical)
            .projection(
                args.projection
                    .clone()
                    .map(|p| p.with_field(self.key.as_str())),
            );

        if let Some(cursor) = self.after.as_ref().or(self.before.as_ref()) {
            fetch = fetch
                .cursor(SeekCursor::new(self.key.clone(), cursor.value.clone()))
                .skip(1);
        }

        fetch
    }

    /// Fetch one page from a data source
    pub async fn paginate<S>(
        self,
        source: &S,
        args: PaginateArgs,
    ) -> Result<PagingResult<S::Record>>
    where
        S: DataSource + ?Sized,
    {
        let fetch = self.fetch_args(&args);
        tracing::debug!(
            key = %self.key,
            limit = self.limit,
            order = ?fetch.order_by.as_ref().map(|o| o.order),
            after = self.after.is_some(),
            before = self.before.is_some(),
            "paginating"
        );

        let rows = source.find_many(fetch).await?;
        self.finish(rows)
    }

    /// Turn fetched rows (physical order, up to `limit + 1`) into a page
    pub fn finish<T: PageRecord>(&self, mut rows: Vec<T>) -> Result<PagingResult<T>> {
        let has_more = rows.len() > self.limit;
        if has_more {
            rows.truncate(self.limit);
        }

        if self.before.is_some() {
            rows.reverse();
        }

        let (next_after, next_before) = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => (
                Some(self.encode_row(last)?),
                Some(self.encode_row(first)?),
            ),
            _ => (None, None),
        };

        let has_next = self.before.is_some() || has_more;
        let has_previous = self.after.is_some() || (self.before.is_some() && has_more);

        tracing::trace!(rows = rows.len(), has_more, has_next, has_previous, "page ready");

        Ok(PagingResult {
            data: rows,
            cursor: CursorPair {
                after_cursor: next_after.filter(|_| has_next),
                before_cursor: next_before.filter(|_| has_previous),
            },
        })
    }

    fn decode_for_key(&self, token: &str) -> Result<Cursor> {
        let cursor = Cursor::decode(token)?;
        if cursor.key != self.key {
            return Err(Error::CursorKeyMismatch {
                expected: self.key.to_string(),
                found: cursor.key.to_string(),
            });
        }
        Ok(cursor)
    }

    fn encode_row<T: PageRecord>(&self, row: &T) -> Result<String> {
        let value = row
            .field(self.key.as_str())
            .ok_or_else(|| Error::missing_key(self.key.as_str()))?;
        Cursor::new(self.key.clone(), value).encode()
    }
}

/// Build a paginator from request options
///
/// Empty cursor strings count as absent.
pub fn build_paginator(options: PaginationOptions) -> Result<Paginator> {
    let PaginationOptions {
        query,
        pagination_key,
    } = options;

    let mut paginator = Paginator::new(pagination_key);

    if let Some(cursor) = query.after_cursor.as_deref().filter(|c| !c.is_empty()) {
        paginator.set_after_cursor(cursor)?;
    }

    if let Some(cursor) = query.before_cursor.as_deref().filter(|c| !c.is_empty()) {
        paginator.set_before_cursor(cursor)?;
    }

    if let Some(limit) = query.limit {
        paginator.set_limit(limit)?;
    }

    if let Some(order) = query.order {
        paginator.set_order(order);
    }

    Ok(paginator)
}

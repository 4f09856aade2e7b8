//! Data source types and traits
//!
//! Defines the fetch contract every paginated store implements.

use crate::error::Result;
use crate::types::{Filter, JsonValue, PaginationKey, Projection, SortOrder};
use async_trait::async_trait;

/// Seek position for a cursor-driven fetch
#[derive(Debug, Clone, PartialEq)]
pub struct SeekCursor {
    /// Field to seek on (must match the order-by field)
    pub key: PaginationKey,
    /// Key value of the boundary row
    pub value: JsonValue,
}

impl SeekCursor {
    /// Create a seek cursor
    pub fn new(key: impl Into<PaginationKey>, value: impl Into<JsonValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordering of a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field to order on
    pub field: String,
    /// Direction
    pub order: SortOrder,
}

impl OrderBy {
    /// Create an ordering
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// Arguments to [`DataSource::find_many`]
///
/// Without a cursor, `skip` is a plain offset. With a cursor, `skip == 0`
/// starts at the first row not ordered before the cursor value, and
/// `skip >= 1` starts strictly after it and then skips `skip - 1` more rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindManyArgs {
    /// Row filter
    pub filter: Filter,
    /// Maximum rows to return (`None` = all)
    pub take: Option<usize>,
    /// Rows to skip
    pub skip: usize,
    /// Seek position
    pub cursor: Option<SeekCursor>,
    /// Ordering
    pub order_by: Option<OrderBy>,
    /// Returned fields
    pub projection: Option<Projection>,
}

impl FindManyArgs {
    /// Create args with a filter
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    /// Set take
    #[must_use]
    pub fn take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    /// Set skip
    #[must_use]
    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Set seek cursor
    #[must_use]
    pub fn cursor(mut self, cursor: SeekCursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Set ordering
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some(OrderBy::new(field, order));
        self
    }

    /// Set projection
    #[must_use]
    pub fn projection(mut self, projection: Option<Projection>) -> Self {
        self.projection = projection;
        self
    }
}

/// A row the paginator can read its key from
pub trait PageRecord {
    /// Value of a field, if present
    fn field(&self, name: &str) -> Option<JsonValue>;
}

impl PageRecord for JsonValue {
    fn field(&self, name: &str) -> Option<JsonValue> {
        self.get(name).filter(|v| !v.is_null()).cloned()
    }
}

/// Ordered, filterable, seekable store
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Row type
    type Record: PageRecord + Send;

    /// Fetch rows (filter, seek, skip, order, take, project)
    async fn find_many(&self, args: FindManyArgs) -> Result<Vec<Self::Record>>;

    /// Count rows matching a filter
    async fn count(&self, filter: &Filter) -> Result<u64>;
}

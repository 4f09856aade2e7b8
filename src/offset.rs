//! Offset pagination
//!
//! Page-number pagination (`skip = (page - 1) * limit`, `take = limit`) with
//! a total count fetched alongside the page.

use crate::error::{Error, Result};
use crate::source::{DataSource, FindManyArgs};
use crate::types::{Filter, Projection, SortOrder};
use serde::{Deserialize, Serialize};

/// Requested page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOptions {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: usize,
    /// Page size
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageOptions {
    /// Create page options (validated)
    pub fn new(page: usize, limit: usize) -> Result<Self> {
        let options = Self { page, limit };
        options.validate()?;
        Ok(options)
    }

    /// Check page and limit bounds
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(Error::InvalidPage { page: self.page });
        }
        if self.limit == 0 {
            return Err(Error::InvalidLimit { limit: self.limit });
        }
        // The skip must be representable
        if (self.page - 1).checked_mul(self.limit).is_none() {
            return Err(Error::InvalidPage { page: self.page });
        }
        Ok(())
    }

    /// Rows to skip
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Page metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetPagination {
    /// Page size
    pub limit: usize,
    /// Current page number
    pub current_page: usize,
    /// Next page number, if any
    pub next_page: Option<usize>,
    /// Previous page number, if any
    pub previous_page: Option<usize>,
    /// Rows matching the filter (`None` when counting was skipped)
    pub total_records: Option<u64>,
    /// Number of pages (`None` when counting was skipped)
    pub total_pages: Option<u64>,
}

impl OffsetPagination {
    /// Compute metadata from a total and the requested page
    pub fn new(total_records: Option<u64>, options: &PageOptions) -> Self {
        let limit = options.limit.max(1);
        let total_pages = total_records.map(|total| total.div_ceil(limit as u64));

        let next_page = match total_pages {
            Some(pages) if (options.page as u64) < pages => options.page.checked_add(1),
            Some(_) => None,
            None => options.page.checked_add(1),
        };
        let previous_page = (options.page > 1).then(|| options.page - 1);

        Self {
            limit: options.limit,
            current_page: options.page,
            next_page,
            previous_page,
            total_records,
            total_pages,
        }
    }
}

/// Offset page of rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetPaginated<T> {
    /// Rows
    pub data: Vec<T>,
    /// Metadata
    pub pagination: OffsetPagination,
}

/// Fetch options for [`paginate_offset`]
#[derive(Debug, Clone, Default)]
pub struct OffsetArgs {
    /// Row filter
    pub filter: Filter,
    /// Ordering field and direction
    pub order_by: Option<(String, SortOrder)>,
    /// Returned fields
    pub projection: Option<Projection>,
    /// Skip the count query
    pub skip_count: bool,
    /// Ignore page/limit and fetch every row
    pub take_all: bool,
}

impl OffsetArgs {
    /// Args with a filter
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    /// Order by a field
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some((field.into(), order));
        self
    }

    /// Skip the count query
    #[must_use]
    pub fn skip_count(mut self) -> Self {
        self.skip_count = true;
        self
    }

    /// Fetch every row
    #[must_use]
    pub fn take_all(mut self) -> Self {
        self.take_all = true;
        self
    }
}

/// Fetch one offset page and its metadata
///
/// The page and the count run concurrently; either failing fails the call.
pub async fn paginate_offset<S>(
    source: &S,
    options: &PageOptions,
    args: OffsetArgs,
) -> Result<OffsetPaginated<S::Record>>
where
    S: DataSource + ?Sized,
{
    options.validate()?;

    let mut fetch = FindManyArgs::new(args.filter.clone()).projection(args.projection);
    if let Some((field, order)) = args.order_by {
        fetch = fetch.order_by(field, order);
    }
    if !args.take_all {
        fetch = fetch.skip(options.offset()).take(options.limit);
    }

    tracing::debug!(
        page = options.page,
        limit = options.limit,
        skip_count = args.skip_count,
        take_all = args.take_all,
        "offset pagination"
    );

    let count = async {
        if args.skip_count {
            Ok(None)
        } else {
            source.count(&args.filter).await.map(Some)
        }
    };

    let (data, total) = futures::try_join!(source.find_many(fetch), count)?;

    Ok(OffsetPaginated {
        data,
        pagination: OffsetPagination::new(total, options),
    })
}

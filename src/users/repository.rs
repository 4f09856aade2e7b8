//! User repository over a JSON data source

use super::types::User;
use crate::error::Result;
use crate::listing::{list_cursor, CursorPaginated, ListingConfig};
use crate::offset::{paginate_offset, OffsetArgs, OffsetPaginated, PageOptions};
use crate::pagination::PagingQuery;
use crate::source::{DataSource, FindManyArgs};
use crate::types::{Filter, JsonValue, SortOrder};

/// Users stored in any JSON-yielding data source
#[derive(Debug, Clone)]
pub struct UserRepository<S> {
    source: S,
    listing: ListingConfig,
}

impl<S> UserRepository<S>
where
    S: DataSource<Record = JsonValue>,
{
    /// Create a repository with cursor listings keyed on `id`
    pub fn new(source: S) -> Self {
        Self {
            source,
            listing: ListingConfig::default(),
        }
    }

    /// Create a repository with explicit listing settings
    pub fn with_listing(source: S, listing: ListingConfig) -> Self {
        Self { source, listing }
    }

    /// Underlying data source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Listing settings
    pub fn listing(&self) -> &ListingConfig {
        &self.listing
    }

    fn active() -> Filter {
        Filter::new().is_null("deleted_at")
    }

    async fn find_one(&self, filter: Filter) -> Result<Option<User>> {
        let rows = self.source.find_many(FindManyArgs::new(filter).take(1)).await?;
        rows.into_iter().next().map(User::from_record).transpose()
    }

    /// Look a user up by id (soft-deleted users included)
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        self.find_one(Filter::new().eq("id", id)).await
    }

    /// Look a user up by email (soft-deleted users included)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_one(Filter::new().eq("email", email)).await
    }

    /// Page through active users, newest first
    pub async fn find_all(&self, page: usize, limit: usize) -> Result<OffsetPaginated<User>> {
        let options = PageOptions::new(page, limit)?;
        let result = paginate_offset(
            &self.source,
            &options,
            OffsetArgs::new(Self::active()).order_by("created_at", SortOrder::Desc),
        )
        .await?;

        Ok(OffsetPaginated {
            data: result
                .data
                .into_iter()
                .map(User::from_record)
                .collect::<Result<Vec<_>>>()?,
            pagination: result.pagination,
        })
    }

    /// Walk active users by cursor
    pub async fn find_all_cursor(&self, request: &PagingQuery) -> Result<CursorPaginated<User>> {
        let listing = list_cursor(&self.source, &self.listing, request, Self::active(), None).await?;
        tracing::debug!(
            returned = listing.data.len(),
            total = listing.pagination.total_records,
            "listed users"
        );
        listing.try_map(User::from_record)
    }

    /// Number of active users
    pub async fn count(&self) -> Result<u64> {
        self.source.count(&Self::active()).await
    }
}

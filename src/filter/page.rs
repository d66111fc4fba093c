//! Offset paging over a compiled `UniversityQuery`.
//!
//! The total is counted first and the page is fetched in a second round trip.
//! The two reads are not transactionally consistent: a record inserted or removed
//! between them can leave `total` (and therefore `totalPages` / `hasNextPage`)
//! stale relative to the returned slice. That race is accepted; nothing retries.

use serde::Serialize;

use super::error::FilterError;
use super::types::UniversityQuery;
use crate::database::models::University;
use crate::database::UniversityStore;
use crate::services::ServiceError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Validated paging input: `page >= 1`, `1 <= limit <= 100`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE as u64,
            limit: DEFAULT_LIMIT as u64,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Result<Self, FilterError> {
        if page < 1 {
            return Err(FilterError::InvalidPage(page));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(FilterError::InvalidLimit(limit));
        }
        Ok(Self {
            page: page as u64,
            limit: limit as u64,
        })
    }

    /// Absent or non-numeric values fall back to the defaults; numbers are range-checked.
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Result<Self, FilterError> {
        let parse = |raw: Option<&str>, default: i64| {
            raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(default)
        };
        Self::new(parse(page, DEFAULT_PAGE), parse(limit, DEFAULT_LIMIT))
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// Paging metadata for `total` matches. With `total == 0` every page is accepted.
    pub fn compute(total: u64, request: PageRequest) -> Result<Self, FilterError> {
        let total_pages = total.div_ceil(request.limit);
        if request.page > total_pages && total > 0 {
            return Err(FilterError::PageOutOfRange {
                page: request.page,
                total_pages,
            });
        }
        Ok(Self {
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
            has_next_page: request.page.saturating_mul(request.limit) < total,
            has_prev_page: request.page > 1,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

pub struct PagedResultAssembler<'a> {
    store: &'a dyn UniversityStore,
}

impl<'a> PagedResultAssembler<'a> {
    pub fn new(store: &'a dyn UniversityStore) -> Self {
        Self { store }
    }

    pub async fn assemble(
        &self,
        query: &UniversityQuery,
        request: PageRequest,
    ) -> Result<Page<University>, ServiceError> {
        let total = self.store.count(query).await?;
        let pagination = Pagination::compute(total, request)?;

        let items = if total == 0 {
            Vec::new()
        } else {
            self.store.find_page(query, request.skip(), request.limit()).await?
        };

        tracing::debug!(
            total,
            page = pagination.page,
            returned = items.len(),
            "Assembled university page"
        );
        Ok(Page { items, pagination })
    }
}

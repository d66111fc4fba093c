use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::database::models::University;

/// Raw list query string, e.g. `?active=true&bookmarked=true&page=2&limit=5`.
/// Values stay as strings; the compiler decides what they mean.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub active: Option<String>,
    pub deleted: Option<String>,
    pub bookmarked: Option<String>,
    pub country: Option<String>,
    pub created_after: Option<String>,
}

/// A single refinement over university records
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `isActive == true AND deletedAt == null`
    ActiveOnly,
    /// `isActive == false OR deletedAt != null`
    Inactive,
    /// `deletedAt != null` when true, `deletedAt == null` when false
    Deleted(bool),
    Bookmarked(bool),
    /// Case-insensitive literal substring of `country`
    CountryContains(String),
    CreatedAtOrAfter(DateTime<Utc>),
}

impl Predicate {
    pub fn matches(&self, record: &University) -> bool {
        match self {
            Predicate::ActiveOnly => record.is_active && record.deleted_at.is_none(),
            Predicate::Inactive => !record.is_active || record.deleted_at.is_some(),
            Predicate::Deleted(deleted) => record.deleted_at.is_some() == *deleted,
            Predicate::Bookmarked(bookmarked) => record.is_bookmark == *bookmarked,
            Predicate::CountryContains(needle) => record
                .country
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Predicate::CreatedAtOrAfter(after) => record.created_at >= *after,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    IsBookmark,
    CreatedAt,
    Id,
}

impl SortColumn {
    pub fn column(&self) -> &'static str {
        match self {
            SortColumn::IsBookmark => "is_bookmark",
            SortColumn::CreatedAt => "created_at",
            SortColumn::Id => "id",
        }
    }

    fn compare(&self, a: &University, b: &University) -> Ordering {
        match self {
            SortColumn::IsBookmark => a.is_bookmark.cmp(&b.is_bookmark),
            SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            SortColumn::Id => a.id.cmp(&b.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub column: SortColumn,
    pub sort: SortDirection,
}

impl FilterOrderInfo {
    pub fn compare(&self, a: &University, b: &University) -> Ordering {
        self.sort.apply(self.column.compare(a, b))
    }
}

/// Output of the filter compiler: predicates in application order, all conjoined,
/// plus the sort keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniversityQuery {
    pub predicates: Vec<Predicate>,
    pub order: Vec<FilterOrderInfo>,
}

impl UniversityQuery {
    pub fn matches(&self, record: &University) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }
}

/// Typed bind value for generated SQL
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Bool(bool),
    Text(String),
    Timestamp(DateTime<Utc>),
    Int(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

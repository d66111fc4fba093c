use thiserror::Error;

/// Failures while compiling list filters or validating paging input.
/// All of them are the caller's fault and surface as 400.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid date format")]
    InvalidDate(String),

    #[error("Page must be greater than or equal to 1")]
    InvalidPage(i64),

    #[error("Limit must be between 1 and 100")]
    InvalidLimit(i64),

    #[error("Page number {page} is out of range. Total pages: {total_pages}")]
    PageOutOfRange { page: u64, total_pages: u64 },

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),
}

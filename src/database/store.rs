use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{NewUniversity, University, UserAccount};
use crate::filter::types::UniversityQuery;

/// Errors raised by a storage collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Document store for university records.
///
/// Every call is a suspension point. Writes replace the whole document and the
/// last one to land wins; there is no version token.
#[async_trait]
pub trait UniversityStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<University>, StoreError>;

    /// Case-insensitive lookup across every record, deleted ones included.
    async fn find_by_name(&self, name: &str) -> Result<Option<University>, StoreError>;

    async fn count(&self, query: &UniversityQuery) -> Result<u64, StoreError>;

    async fn find_page(
        &self,
        query: &UniversityQuery,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<University>, StoreError>;

    /// Assigns the id and both timestamps.
    async fn insert(&self, draft: NewUniversity) -> Result<University, StoreError>;

    /// Replaces the stored document and bumps `last_modified_at`.
    async fn save(&self, record: University) -> Result<University, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError>;

    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<UserAccount, StoreError>;
}

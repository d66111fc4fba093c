use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{NewUniversity, University, UserAccount};
use crate::database::query_builder;
use crate::database::store::{StoreError, UniversityStore, UserStore};
use crate::filter::types::{FilterOrderInfo, SortColumn, SortDirection, UniversityQuery};

const UNIVERSITIES_TABLE: &str = "universities";

/// Postgres has no natural row order, so paging ties fall back to insertion time then id
const TIEBREAK: [FilterOrderInfo; 2] = [
    FilterOrderInfo { column: SortColumn::CreatedAt, sort: SortDirection::Asc },
    FilterOrderInfo { column: SortColumn::Id, sort: SortDirection::Asc },
];

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Document store backed by one postgres row per document
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unique key").to_string();
            return StoreError::Duplicate(constraint);
        }
    }
    StoreError::Sqlx(err)
}

#[async_trait]
impl UniversityStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<University>, StoreError> {
        let row = sqlx::query_as::<_, University>(r#"SELECT * FROM "universities" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<University>, StoreError> {
        let row = sqlx::query_as::<_, University>(
            r#"SELECT * FROM "universities" WHERE lower("name") = lower($1) LIMIT 1"#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn count(&self, query: &UniversityQuery) -> Result<u64, StoreError> {
        let sql = query
            .to_count_sql(UNIVERSITIES_TABLE)
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        query_builder::count(&self.pool, &sql).await
    }

    async fn find_page(
        &self,
        query: &UniversityQuery,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<University>, StoreError> {
        let skip = i64::try_from(skip).unwrap_or(i64::MAX);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let sql = query
            .to_sql(UNIVERSITIES_TABLE, &TIEBREAK, skip, limit)
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        query_builder::select_all(&self.pool, &sql).await
    }

    async fn insert(&self, draft: NewUniversity) -> Result<University, StoreError> {
        sqlx::query_as::<_, University>(
            r#"INSERT INTO "universities"
                ("id", "name", "country", "webpages", "is_bookmark", "is_active", "deleted_at", "created_at", "last_modified_at")
               VALUES ($1, $2, $3, $4, $5, $6, NULL, now(), now())
               RETURNING *"#,
        )
        .bind(Uuid::new_v4())
        .bind(draft.name)
        .bind(draft.country)
        .bind(draft.webpages)
        .bind(draft.is_bookmark)
        .bind(draft.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn save(&self, record: University) -> Result<University, StoreError> {
        let id = record.id;
        let saved = sqlx::query_as::<_, University>(
            r#"UPDATE "universities"
               SET "name" = $2, "country" = $3, "webpages" = $4, "is_bookmark" = $5,
                   "is_active" = $6, "deleted_at" = $7, "last_modified_at" = now()
               WHERE "id" = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(record.name)
        .bind(record.country)
        .bind(record.webpages)
        .bind(record.is_bookmark)
        .bind(record.is_active)
        .bind(record.deleted_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        saved.ok_or(StoreError::NotFound(id))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError> {
        let row = sqlx::query_as::<_, UserAccount>(r#"SELECT * FROM "users" WHERE "username" = $1"#)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<UserAccount, StoreError> {
        sqlx::query_as::<_, UserAccount>(
            r#"INSERT INTO "users" ("id", "username", "password", "created_at")
               VALUES ($1, $2, $3, now())
               RETURNING *"#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }
}

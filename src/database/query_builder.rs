use sqlx::{self, postgres::PgArguments, postgres::PgRow, FromRow, PgPool, Row};

use crate::database::store::StoreError;
use crate::filter::types::{SqlParam, SqlResult};

/// Runs a generated `SELECT` and maps every row into `T`
pub async fn select_all<T>(pool: &PgPool, sql: &SqlResult) -> Result<Vec<T>, StoreError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut q = sqlx::query_as::<_, T>(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query_as(q, p);
    }
    let rows = q.fetch_all(pool).await?;
    Ok(rows)
}

/// Runs a generated `SELECT COUNT(*) AS count`
pub async fn count(pool: &PgPool, sql: &SqlResult) -> Result<u64, StoreError> {
    let mut q = sqlx::query(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query(q, p);
    }
    let row = q.fetch_one(pool).await?;
    let count: i64 = row.try_get("count")?;
    u64::try_from(count).map_err(|_| StoreError::QueryError(format!("negative count {}", count)))
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &SqlParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        SqlParam::Bool(b) => q.bind(*b),
        SqlParam::Text(s) => q.bind(s.clone()),
        SqlParam::Timestamp(t) => q.bind(*t),
        SqlParam::Int(i) => q.bind(*i),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlParam::Bool(b) => q.bind(*b),
        SqlParam::Text(s) => q.bind(s.clone()),
        SqlParam::Timestamp(t) => q.bind(*t),
        SqlParam::Int(i) => q.bind(*i),
    }
}

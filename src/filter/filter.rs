use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{
    FilterOrderInfo, ListParams, Predicate, SortColumn, SortDirection, SqlParam, SqlResult,
    UniversityQuery,
};

/// Translates list query parameters into a `UniversityQuery`.
///
/// Predicates are appended in a fixed order (active, deleted, bookmarked, country,
/// createdAfter) and conjoined. Contradictory combinations such as
/// `active=true&deleted=true` are not rejected; they simply match nothing.
pub struct FilterCompiler;

impl FilterCompiler {
    pub fn compile(params: &ListParams) -> Result<UniversityQuery, FilterError> {
        let mut predicates = Vec::new();

        match tri_state(params.active.as_deref()) {
            Some(true) => predicates.push(Predicate::ActiveOnly),
            Some(false) => predicates.push(Predicate::Inactive),
            None => {}
        }

        if let Some(deleted) = tri_state(params.deleted.as_deref()) {
            predicates.push(Predicate::Deleted(deleted));
        }

        if let Some(bookmarked) = tri_state(params.bookmarked.as_deref()) {
            predicates.push(Predicate::Bookmarked(bookmarked));
        }

        if let Some(country) = params.country.as_deref().filter(|c| !c.is_empty()) {
            predicates.push(Predicate::CountryContains(country.to_string()));
        }

        if let Some(raw) = params.created_after.as_deref().filter(|d| !d.is_empty()) {
            predicates.push(Predicate::CreatedAtOrAfter(parse_date(raw)?));
        }

        let query = UniversityQuery {
            predicates,
            // Bookmarked records always surface first
            order: vec![FilterOrderInfo {
                column: SortColumn::IsBookmark,
                sort: SortDirection::Desc,
            }],
        };
        tracing::debug!(?query, "Compiled university filters");
        Ok(query)
    }
}

/// `"true"` and `"false"` are the only recognised values; anything else is ignored.
fn tri_state(raw: Option<&str>) -> Option<bool> {
    match raw {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Offset date-times, with `Z` or `±HH:MM`, seconds and fraction optional
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];

/// Date-times without an offset, read as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Accepts the ISO date-time shapes: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, and
/// `YYYY-MM-DDTHH:MM[:SS[.fff]]` with an optional `Z` / `±HH:MM` offset.
/// Partial dates mean their first instant in UTC.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, FilterError> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let with_offset = match trimmed.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => trimmed.to_string(),
    };
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_partial_date(trimmed))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| FilterError::InvalidDate(raw.to_string()))
}

/// `YYYY` or `YYYY-MM`, as the first day of that period
fn parse_partial_date(raw: &str) -> Option<NaiveDate> {
    let digits = |part: &str, len: usize| part.len() == len && part.bytes().all(|b| b.is_ascii_digit());

    let mut parts = raw.split('-');
    let year = parts.next().filter(|y| digits(y, 4))?.parse().ok()?;
    let month = match parts.next() {
        None => 1,
        Some(m) if digits(m, 2) => m.parse().ok()?,
        Some(_) => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)
}

impl UniversityQuery {
    /// Full `SELECT` for one page. `tiebreak` is appended after the compiled sort keys.
    pub fn to_sql(
        &self,
        table_name: &str,
        tiebreak: &[FilterOrderInfo],
        skip: i64,
        limit: i64,
    ) -> Result<SqlResult, FilterError> {
        validate_table_name(table_name)?;
        let (where_clause, mut params) = FilterWhere::generate(&self.predicates, 0);

        let mut order = self.order.clone();
        order.extend_from_slice(tiebreak);
        let order_clause = FilterOrder::generate(&order);

        let limit_param = params.len() + 1;
        let offset_param = params.len() + 2;
        params.push(SqlParam::Int(limit));
        params.push(SqlParam::Int(skip));

        let query = [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", table_name),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            order_clause,
            format!("LIMIT ${} OFFSET ${}", limit_param, offset_param),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self, table_name: &str) -> Result<SqlResult, FilterError> {
        validate_table_name(table_name)?;
        let (where_clause, params) = FilterWhere::generate(&self.predicates, 0);
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"{}\"", table_name)
        } else {
            format!("SELECT COUNT(*) AS count FROM \"{}\" WHERE {}", table_name, where_clause)
        };
        Ok(SqlResult { query, params })
    }
}

fn validate_table_name(name: &str) -> Result<(), FilterError> {
    let mut chars = name.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FilterError::InvalidTableName(name.to_string()));
    }
    Ok(())
}

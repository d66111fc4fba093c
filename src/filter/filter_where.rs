use super::types::{Predicate, SqlParam};

/// Renders compiled predicates into a parameterized postgres `WHERE` body
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Returns an empty clause when there is nothing to filter on.
    pub fn generate(predicates: &[Predicate], starting_param_index: usize) -> (String, Vec<SqlParam>) {
        let mut filter_where = Self::new(starting_param_index);
        let conditions: Vec<String> = predicates
            .iter()
            .map(|p| filter_where.build_sql_condition(p))
            .collect();
        (conditions.join(" AND "), filter_where.param_values)
    }

    fn build_sql_condition(&mut self, predicate: &Predicate) -> String {
        match predicate {
            Predicate::ActiveOnly => "(\"is_active\" = TRUE AND \"deleted_at\" IS NULL)".to_string(),
            Predicate::Inactive => "(\"is_active\" = FALSE OR \"deleted_at\" IS NOT NULL)".to_string(),
            Predicate::Deleted(true) => "\"deleted_at\" IS NOT NULL".to_string(),
            Predicate::Deleted(false) => "\"deleted_at\" IS NULL".to_string(),
            Predicate::Bookmarked(flag) => {
                format!("\"is_bookmark\" = {}", self.param(SqlParam::Bool(*flag)))
            }
            Predicate::CountryContains(needle) => {
                let pattern = format!("%{}%", escape_like(needle));
                format!("\"country\" ILIKE {} ESCAPE '\\'", self.param(SqlParam::Text(pattern)))
            }
            Predicate::CreatedAtOrAfter(after) => {
                format!("\"created_at\" >= {}", self.param(SqlParam::Timestamp(*after)))
            }
        }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Country filters are literal substrings, so LIKE metacharacters are escaped.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn numbers_params_in_order() {
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let (sql, params) = FilterWhere::generate(
            &[
                Predicate::Deleted(false),
                Predicate::Bookmarked(true),
                Predicate::CountryContains("kingdom".to_string()),
                Predicate::CreatedAtOrAfter(after),
            ],
            0,
        );
        assert_eq!(
            sql,
            "\"deleted_at\" IS NULL AND \"is_bookmark\" = $1 AND \"country\" ILIKE $2 ESCAPE '\\' AND \"created_at\" >= $3"
        );
        assert_eq!(
            params,
            vec![
                SqlParam::Bool(true),
                SqlParam::Text("%kingdom%".to_string()),
                SqlParam::Timestamp(after),
            ]
        );
    }

    #[test]
    fn inactive_is_a_disjunction() {
        let (sql, params) = FilterWhere::generate(&[Predicate::Inactive], 0);
        assert_eq!(sql, "(\"is_active\" = FALSE OR \"deleted_at\" IS NOT NULL)");
        assert!(params.is_empty());
    }

    #[test]
    fn empty_predicates_render_nothing() {
        let (sql, params) = FilterWhere::generate(&[], 0);
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}

use std::cmp::Ordering;

use super::types::FilterOrderInfo;
use crate::database::models::University;

pub struct FilterOrder;

impl FilterOrder {
    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column.column(), i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }

    /// Compares by each key in turn; equal records keep their relative order
    /// when used with a stable sort.
    pub fn compare(infos: &[FilterOrderInfo], a: &University, b: &University) -> Ordering {
        infos
            .iter()
            .map(|info| info.compare(a, b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

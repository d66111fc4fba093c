use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::University;
use crate::filter::{Page, Pagination};

/// Public wire format of a university record.
/// `id` is derived from the storage key here and nowhere else.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityView {
    pub id: String,
    pub name: String,
    pub country: String,
    pub webpages: Vec<String>,
    pub is_bookmark: bool,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}

impl From<University> for UniversityView {
    fn from(record: University) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name,
            country: record.country,
            webpages: record.webpages,
            is_bookmark: record.is_bookmark,
            is_active: record.is_active,
            deleted_at: record.deleted_at,
            created_at: record.created_at,
            last_modified_at: record.last_modified_at,
        }
    }
}

/// `{ universities: [...], pagination: {...} }`
#[derive(Debug, Clone, Serialize)]
pub struct UniversityPageView {
    pub universities: Vec<UniversityView>,
    pub pagination: Pagination,
}

impl From<Page<University>> for UniversityPageView {
    fn from(page: Page<University>) -> Self {
        Self {
            universities: page.items.into_iter().map(UniversityView::from).collect(),
            pagination: page.pagination,
        }
    }
}

//! Pre-write checks for university documents.
//!
//! These run explicitly before every create and update; the store itself only
//! guards the unique name index.

use chrono::{DateTime, Utc};
use thiserror::Error;
use url::{Host, Url};
use uuid::Uuid;

use crate::database::models::{NewUniversity, University};
use crate::database::{StoreError, UniversityStore};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteViolation {
    #[error("name is required")]
    MissingName,

    #[error("country is required")]
    MissingCountry,

    #[error("webpages contains invalid url: {0}")]
    InvalidUrl(String),

    #[error("University name already exists")]
    DuplicateName,

    #[error("A deleted university cannot be active; restore it instead")]
    DeletedButActive,
}

/// The fields a write validates, borrowed from either a draft or a stored record
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    pub name: &'a str,
    pub country: &'a str,
    pub webpages: &'a [String],
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a NewUniversity> for Document<'a> {
    fn from(draft: &'a NewUniversity) -> Self {
        Self {
            name: &draft.name,
            country: &draft.country,
            webpages: &draft.webpages,
            is_active: draft.is_active,
            deleted_at: None,
        }
    }
}

impl<'a> From<&'a University> for Document<'a> {
    fn from(record: &'a University) -> Self {
        Self {
            name: &record.name,
            country: &record.country,
            webpages: &record.webpages,
            is_active: record.is_active,
            deleted_at: record.deleted_at,
        }
    }
}

/// Field-level checks that need no storage access
pub fn check_document(doc: Document<'_>) -> Result<(), WriteViolation> {
    if doc.name.trim().is_empty() {
        return Err(WriteViolation::MissingName);
    }
    if doc.country.trim().is_empty() {
        return Err(WriteViolation::MissingCountry);
    }
    if let Some(bad) = doc.webpages.iter().find(|url| !is_valid_url(url)) {
        return Err(WriteViolation::InvalidUrl(bad.clone()));
    }
    if doc.deleted_at.is_some() && doc.is_active {
        return Err(WriteViolation::DeletedButActive);
    }
    Ok(())
}

/// Absolute http(s) URL with a host; domain names need a dot-separated TLD.
pub fn is_valid_url(raw: &str) -> bool {
    if raw.is_empty() || raw != raw.trim() {
        return false;
    }
    let Ok(url) = Url::parse(raw) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    match url.host() {
        Some(Host::Domain(domain)) => domain
            .rsplit_once('.')
            .is_some_and(|(label, tld)| !label.is_empty() && !tld.is_empty()),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

/// Fails when a different record (deleted ones included) holds the normalized name.
pub async fn check_unique_name(
    store: &dyn UniversityStore,
    name: &str,
    own_id: Option<Uuid>,
) -> Result<Result<(), WriteViolation>, StoreError> {
    let existing = store.find_by_name(name).await?;
    Ok(match existing {
        Some(other) if Some(other.id) != own_id => Err(WriteViolation::DuplicateName),
        _ => Ok(()),
    })
}

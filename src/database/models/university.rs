use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// Payload key that only the soft-delete path may change
pub const DELETED_AT_FIELD: &str = "deletedAt";

/// A university document as held by the storage collaborator.
///
/// `id` is assigned by the store on insert and never reassigned. The public `id`
/// attribute is derived from it when the record is serialized (see `api::format`).
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct University {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub webpages: Vec<String>,
    pub is_bookmark: bool,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}

/// Coarse lifecycle state; the bookmark flag is independent of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    InactiveNotDeleted,
    Deleted,
}

impl University {
    pub fn lifecycle_state(&self) -> LifecycleState {
        match (self.deleted_at, self.is_active) {
            (Some(_), _) => LifecycleState::Deleted,
            (None, true) => LifecycleState::Active,
            (None, false) => LifecycleState::InactiveNotDeleted,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Not guarded against re-deletion: a second call only moves the timestamp.
    pub fn soft_delete(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.is_active = false;
    }

    pub fn restore(&mut self) {
        self.deleted_at = None;
        self.is_active = true;
    }

    pub fn toggle_bookmark(&mut self) {
        self.is_bookmark = !self.is_bookmark;
    }

    /// Applies every field present in the patch, normalizing `name` and `country`.
    pub fn apply(&mut self, patch: UniversityPatch) {
        if let Some(name) = patch.name {
            self.name = normalize_name(&name);
        }
        if let Some(country) = patch.country {
            self.country = country.trim().to_string();
        }
        if let Some(webpages) = patch.webpages {
            self.webpages = webpages;
        }
        if let Some(is_bookmark) = patch.is_bookmark {
            self.is_bookmark = is_bookmark;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
    }
}

/// Draft for a record that does not exist yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewUniversity {
    pub name: String,
    pub country: String,
    pub webpages: Vec<String>,
    pub is_bookmark: bool,
    pub is_active: bool,
}

impl From<UniversityPatch> for NewUniversity {
    fn from(patch: UniversityPatch) -> Self {
        Self {
            name: patch.name.as_deref().map(normalize_name).unwrap_or_default(),
            country: patch
                .country
                .as_deref()
                .map(|c| c.trim().to_string())
                .unwrap_or_default(),
            webpages: patch.webpages.unwrap_or_default(),
            is_bookmark: patch.is_bookmark.unwrap_or(false),
            is_active: patch.is_active.unwrap_or(true),
        }
    }
}

/// Field-level changes accepted from API input (create and update bodies).
/// Identity and timestamp keys are not part of it and are ignored when present.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityPatch {
    pub name: Option<String>,
    pub country: Option<String>,
    pub webpages: Option<Vec<String>>,
    pub is_bookmark: Option<bool>,
    pub is_active: Option<bool>,
}

impl UniversityPatch {
    /// Builds a patch from a raw JSON body, dropping `deletedAt` before anything else.
    pub fn from_payload(mut payload: Map<String, Value>) -> Result<Self, serde_json::Error> {
        if payload.remove(DELETED_AT_FIELD).is_some() {
            tracing::debug!("Ignoring {} in university payload", DELETED_AT_FIELD);
        }
        serde_json::from_value(Value::Object(payload))
    }
}

pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> University {
        let now = Utc::now();
        University {
            id: Uuid::new_v4(),
            name: "mit".to_string(),
            country: "USA".to_string(),
            webpages: vec!["https://mit.edu".to_string()],
            is_bookmark: false,
            is_active: true,
            deleted_at: None,
            created_at: now,
            last_modified_at: now,
        }
    }

    #[test]
    fn soft_delete_then_restore_round_trips() {
        let mut record = sample();
        record.soft_delete(Utc::now());
        assert_eq!(record.lifecycle_state(), LifecycleState::Deleted);
        assert!(!record.is_active);

        record.restore();
        assert_eq!(record.lifecycle_state(), LifecycleState::Active);
        assert!(record.is_active);
        assert_eq!(record.deleted_at, None);
    }

    #[test]
    fn toggle_twice_is_identity() {
        let mut record = sample();
        record.toggle_bookmark();
        assert!(record.is_bookmark);
        record.toggle_bookmark();
        assert!(!record.is_bookmark);
    }

    #[test]
    fn inactive_without_delete_is_its_own_state() {
        let mut record = sample();
        record.apply(UniversityPatch {
            is_active: Some(false),
            ..Default::default()
        });
        assert_eq!(record.lifecycle_state(), LifecycleState::InactiveNotDeleted);
    }

    #[test]
    fn payload_strips_deleted_at_and_unknown_keys() {
        let payload = json!({
            "name": "  Harvard University ",
            "deletedAt": "2024-01-01T00:00:00Z",
            "id": "ignored",
            "createdAt": "2020-01-01T00:00:00Z"
        });
        let patch = UniversityPatch::from_payload(payload.as_object().cloned().unwrap()).unwrap();
        assert_eq!(patch.name.as_deref(), Some("  Harvard University "));
        assert_eq!(patch.country, None);

        let mut record = sample();
        record.apply(patch);
        assert_eq!(record.name, "harvard university");
        assert_eq!(record.deleted_at, None);
    }

    #[test]
    fn payload_with_wrong_types_is_rejected() {
        let payload = json!({ "webpages": "https://mit.edu" });
        assert!(UniversityPatch::from_payload(payload.as_object().cloned().unwrap()).is_err());
    }

    #[test]
    fn draft_takes_defaults() {
        let draft = NewUniversity::from(UniversityPatch {
            name: Some("MIT".to_string()),
            country: Some(" USA ".to_string()),
            ..Default::default()
        });
        assert_eq!(draft.name, "mit");
        assert_eq!(draft.country, "USA");
        assert!(draft.webpages.is_empty());
        assert!(!draft.is_bookmark);
        assert!(draft.is_active);
    }
}

//! University lifecycle: create, update, soft delete, restore and bookmark toggling,
//! plus the filtered listing.
//!
//! Every mutation loads the current document, applies the transition in memory and
//! saves the whole document back. No lock or version token is involved, so two
//! concurrent writes to one record resolve as last write wins at the store.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::models::{NewUniversity, University, UniversityPatch};
use crate::database::{StoreError, UniversityStore};
use crate::filter::{FilterCompiler, ListParams, Page, PageRequest, PagedResultAssembler};
use crate::services::validation::{self, Document, WriteViolation};
use crate::services::ServiceError;
use crate::types::Transition;

#[derive(Clone)]
pub struct UniversityService {
    store: Arc<dyn UniversityStore>,
}

/// Identifiers are validated before any storage access.
fn parse_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::InvalidId(raw.to_string()))
}

impl UniversityService {
    pub fn new(store: Arc<dyn UniversityStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn UniversityStore {
        self.store.as_ref()
    }

    /// Paging is validated first, then the filters are compiled and executed.
    pub async fn list(&self, params: &ListParams) -> Result<Page<University>, ServiceError> {
        let request = PageRequest::from_params(params.page.as_deref(), params.limit.as_deref())?;
        let query = FilterCompiler::compile(params)?;
        PagedResultAssembler::new(self.store()).assemble(&query, request).await
    }

    pub async fn get(&self, id: &str) -> Result<University, ServiceError> {
        let id = parse_id(id)?;
        self.load(id).await
    }

    pub async fn create(&self, payload: Map<String, Value>) -> Result<University, ServiceError> {
        let patch = UniversityPatch::from_payload(payload)
            .map_err(|e| ServiceError::Validation(format!("University creation failed: {}", e)))?;
        let draft = NewUniversity::from(patch);

        validation::check_document(Document::from(&draft)).map_err(reject_create)?;
        validation::check_unique_name(self.store(), &draft.name, None)
            .await?
            .map_err(reject_create)?;

        let record = self.store.insert(draft).await.map_err(|e| match e {
            // Lost a race against another insert of the same name
            StoreError::Duplicate(_) => reject_create(WriteViolation::DuplicateName),
            other => other.into(),
        })?;
        audit(Transition::Create, &record);
        Ok(record)
    }

    /// Applies the patch verbatim, except `deletedAt` which only `soft_delete` may set.
    pub async fn update(&self, id: &str, payload: Map<String, Value>) -> Result<University, ServiceError> {
        let id = parse_id(id)?;
        let mut record = self.load(id).await?;

        let patch = UniversityPatch::from_payload(payload)
            .map_err(|e| ServiceError::Validation(format!("Update failed: {}", e)))?;
        let previous_name = record.name.clone();
        record.apply(patch);

        validation::check_document(Document::from(&record)).map_err(reject_update)?;
        if record.name != previous_name {
            validation::check_unique_name(self.store(), &record.name, Some(record.id))
                .await?
                .map_err(reject_update)?;
        }

        self.persist(record, Transition::Update).await
    }

    pub async fn soft_delete(&self, id: &str) -> Result<University, ServiceError> {
        let id = parse_id(id)?;
        self.transition(id, Transition::SoftDelete, |record| record.soft_delete(Utc::now()))
            .await
    }

    pub async fn restore(&self, id: &str) -> Result<University, ServiceError> {
        let id = parse_id(id)?;
        self.transition(id, Transition::Restore, University::restore).await
    }

    pub async fn toggle_bookmark(&self, id: &str) -> Result<University, ServiceError> {
        let id = parse_id(id)?;
        self.transition(id, Transition::ToggleBookmark, University::toggle_bookmark)
            .await
    }

    async fn load(&self, id: Uuid) -> Result<University, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    async fn transition<F>(&self, id: Uuid, transition: Transition, apply: F) -> Result<University, ServiceError>
    where
        F: FnOnce(&mut University) + Send,
    {
        let mut record = self.load(id).await?;
        apply(&mut record);
        self.persist(record, transition).await
    }

    async fn persist(&self, record: University, transition: Transition) -> Result<University, ServiceError> {
        let id = record.id;
        let saved = self.store.save(record).await.map_err(|e| match e {
            StoreError::NotFound(_) => ServiceError::NotFound(id),
            StoreError::Duplicate(_) => reject_update(WriteViolation::DuplicateName),
            other => other.into(),
        })?;
        audit(transition, &saved);
        Ok(saved)
    }
}

/// Duplicate names are a conflict on create
fn reject_create(violation: WriteViolation) -> ServiceError {
    match violation {
        WriteViolation::DuplicateName => ServiceError::Conflict(violation.to_string()),
        other => ServiceError::Validation(format!("University creation failed: {}", other)),
    }
}

/// ...but a plain validation failure on update
fn reject_update(violation: WriteViolation) -> ServiceError {
    match violation {
        WriteViolation::DuplicateName => ServiceError::Validation(violation.to_string()),
        other => ServiceError::Validation(format!("Update failed: {}", other)),
    }
}

fn audit(transition: Transition, record: &University) {
    tracing::info!(
        id = %record.id,
        %transition,
        is_active = record.is_active,
        is_bookmark = record.is_bookmark,
        deleted = record.is_deleted(),
        "University state changed"
    );
}

use thiserror::Error;
use uuid::Uuid;

use crate::database::StoreError;
use crate::filter::FilterError;

/// Failures of the university lifecycle and account operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid university ID format")]
    InvalidId(String),

    #[error("University not found")]
    NotFound(Uuid),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Credential error: {0}")]
    Credential(String),
}

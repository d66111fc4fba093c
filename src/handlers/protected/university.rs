// handlers/protected/university.rs - Mutating university routes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::{Map, Value};

use crate::api::UniversityView;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/**
 * POST /university - Create a university (201)
 *
 * Name is stored trimmed and lowercased. `deletedAt` in the body is ignored.
 * A name already taken by any record, deleted ones included, answers 409.
 */
#[tracing::instrument(skip_all, fields(actor = %user.user))]
pub async fn university_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<UniversityView> {
    let Json(payload) = payload?;
    let record = state.universities.create(payload).await?;
    Ok(ApiResponse::created(record.into()))
}

/// PUT /university/:id - patch fields verbatim, except `deletedAt`
#[tracing::instrument(skip_all, fields(actor = %user.user, id = %id))]
pub async fn university_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<UniversityView> {
    let Json(payload) = payload?;
    let record = state.universities.update(&id, payload).await?;
    Ok(ApiResponse::success(record.into()))
}

/// DELETE /university/:id - soft delete
#[tracing::instrument(skip_all, fields(actor = %user.user, id = %id))]
pub async fn university_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<UniversityView> {
    let record = state.universities.soft_delete(&id).await?;
    Ok(ApiResponse::success(record.into()))
}

/// POST /university/restore/:id - clears `deletedAt` and reactivates
#[tracing::instrument(skip_all, fields(actor = %user.user, id = %id))]
pub async fn university_restore(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<UniversityView> {
    let record = state.universities.restore(&id).await?;
    Ok(ApiResponse::success(record.into()))
}

/// POST /university/bookmark/:id - flips `isBookmark` (201)
#[tracing::instrument(skip_all, fields(actor = %user.user, id = %id))]
pub async fn university_bookmark(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<UniversityView> {
    let record = state.universities.toggle_bookmark(&id).await?;
    Ok(ApiResponse::created(record.into()))
}

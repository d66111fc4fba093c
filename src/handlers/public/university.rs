// handlers/public/university.rs - GET /university and GET /university/:id

use axum::extract::{rejection::QueryRejection, Path, Query, State};

use crate::api::{UniversityPageView, UniversityView};
use crate::app::AppState;
use crate::filter::ListParams;
use crate::middleware::{ApiResponse, ApiResult};

/**
 * GET /university - Filtered, paged listing
 *
 * Query: page, limit, active, deleted, bookmarked, country, createdAfter.
 * Bookmarked records come first. Bad paging or an unparseable
 * `createdAfter` answer 400.
 */
pub async fn university_list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<UniversityPageView> {
    let Query(params) = params?;
    let page = state.universities.list(&params).await?;
    Ok(ApiResponse::success(page.into()))
}

/// GET /university/:id - soft-deleted records are still returned
pub async fn university_show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<UniversityView> {
    let record = state.universities.get(&id).await?;
    Ok(ApiResponse::success(record.into()))
}

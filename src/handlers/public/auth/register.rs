// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Credentials;

/// POST /api/auth/register - create a user account (201)
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(credentials) = payload?;
    let account = state.users.register(credentials).await?;

    Ok(ApiResponse::created(json!({
        "id": account.id,
        "username": account.username,
        "message": "User registered successfully."
    })))
}

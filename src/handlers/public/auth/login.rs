// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Credentials;

/**
 * POST /api/auth/login - Authenticate user and receive JWT token
 *
 * Input: `{ "username": "string", "password": "string" }`
 * Output: `{ "message": "Login successful.", "token": "eyJhbGciOiJIUzI1NiI..." }`
 *
 * Unknown users and wrong passwords both answer 401 "Invalid credentials".
 */
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(credentials) = payload?;
    let token = state.users.login(credentials).await?;

    Ok(ApiResponse::success(json!({
        "message": "Login successful.",
        "token": token
    })))
}

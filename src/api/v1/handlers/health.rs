use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::error::AppError;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Any route nobody registered, once the policy has let the request through.
pub async fn not_found() -> AppError {
    AppError::NotFound("Resource not found")
}

/// Known path, unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

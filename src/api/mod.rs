/*
 * Responsibility
 * - top-level URL structure: /health, /auth/token, /api/v1/...
 * - unknown routes answer with a structured 404 once authorized,
 *   unsupported methods with a structured 405
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod v1;

use v1::handlers::{
    health::{health, method_not_allowed, not_found},
    token::issue_token,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/token", post(issue_token))
        .nest("/api/v1", v1::routes())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

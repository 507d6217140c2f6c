/*
 * Responsibility
 * - v1 URL structure (mounted under /api/v1)
 * - access rules live in the authorization policy, not here
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{
    boats::{create_boat, delete_boat, get_boat, list_boats, update_boat},
    health::method_not_allowed,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/boats", get(list_boats).post(create_boat))
        .route(
            "/boats/{boat_id}",
            get(get_boat).put(update_boat).delete(delete_boat),
        )
        .method_not_allowed_fallback(method_not_allowed)
}

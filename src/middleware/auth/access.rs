//! Bearer token → Principal, then the access decision.
//!
//! Two layers, applied to the whole router so rules see full paths:
//! - authenticate: resolve the bearer token and, if it verifies, insert the
//!   `Principal` into request extensions. Never rejects on its own.
//! - authorize: consult the policy with the (optional) principal.
//!   Anonymous denials get the 401 entry point response, authenticated ones
//!   a 403.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::middleware::auth::entrypoint;
use crate::services::auth::{Decision, DenyReason, Principal};
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // Last layer added runs first: authenticate wraps authorize.
    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authorize_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state,
            authenticate_middleware,
        ))
}

async fn authenticate_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(principal) = state.authenticator.authenticate(req.headers()) {
        tracing::debug!(
            subject = principal.subject(),
            authorities = ?principal.authorities(),
            "request authenticated"
        );
        req.extensions_mut().insert(principal);
    }

    next.run(req).await
}

async fn authorize_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let principal = req.extensions().get::<Principal>();
    let decision = state
        .policy
        .authorize(req.method(), req.uri().path(), principal);

    match decision {
        Decision::Allow => next.run(req).await,
        Decision::Deny(DenyReason::NoPrincipal) => {
            entrypoint::unauthenticated(&state.error_codes, req.method(), req.uri().path())
        }
        Decision::Deny(DenyReason::InsufficientAuthority) => {
            tracing::debug!(
                subject = principal.map(Principal::subject),
                method = %req.method(),
                path = req.uri().path(),
                "access denied"
            );
            AppError::Forbidden.into_response()
        }
    }
}

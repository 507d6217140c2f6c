//! Error body rendering.
//!
//! Handlers and extractors return `AppError`, which only sets the status and
//! attaches an `ErrorReport`. This layer gives the report a fresh error code,
//! logs it, and writes the JSON body, so the code a client sees is always the
//! one in the logs.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::{ApiErrorBody, ErrorReport};
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, render_problem))
}

async fn render_problem(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let mut res = next.run(req).await;
    let Some(report) = res.extensions_mut().remove::<ErrorReport>() else {
        return res;
    };

    let status = res.status();
    let code = state.error_codes.generate();
    let category = report.category.label();

    if status.is_server_error() {
        tracing::error!(%code, category, %method, %path, problems = ?report.problems, "request failed");
    } else {
        tracing::warn!(%code, category, %method, %path, problems = ?report.problems, "request rejected");
    }

    ApiErrorBody::new(code, report.category, report.problems).into_response_with(status)
}

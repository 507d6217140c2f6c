use axum::{
    http::{Method, StatusCode},
    response::Response,
};

use crate::error::{ApiErrorBody, ErrorCategory, Problem};
use crate::services::ErrorCodeGenerator;

pub const UNAUTHENTICATED_MESSAGE: &str = "You must be authenticated";

/// 401 for a protected resource requested without a valid principal.
/// Writes the full body itself, independent of the problem layer.
pub fn unauthenticated(codes: &ErrorCodeGenerator, method: &Method, path: &str) -> Response {
    tracing::debug!("try to '[{method}] {path}' with un-authenticated remote");

    let code = codes.generate();
    tracing::warn!(%code, category = ErrorCategory::Unauthorized.label(), %method, path, "request rejected");

    ApiErrorBody::new(
        code,
        ErrorCategory::Unauthorized,
        vec![Problem::new(UNAUTHENTICATED_MESSAGE)],
    )
    .into_response_with(StatusCode::UNAUTHORIZED)
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[tokio::test]
    async fn writes_a_complete_error_body() {
        let res = unauthenticated(&ErrorCodeGenerator::new(), &Method::GET, "/api/v1/boats");

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()["content-type"], "application/json");

        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["category"], "Unauthorized");
        assert_eq!(json["problems"][0]["error"], UNAUTHENTICATED_MESSAGE);
        assert_eq!(json["code"].as_str().unwrap().len(), 11);
    }
}

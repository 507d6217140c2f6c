use axum::{
    Extension,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::repos::RepoError;
use crate::services::auth::AuthError;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Closed set of error classes exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    Internal,
}

impl ErrorCategory {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCategory::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCategory::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCategory::Forbidden => StatusCode::FORBIDDEN,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::InvalidRequest => "Invalid data",
            ErrorCategory::Unauthorized => "Unauthorized",
            ErrorCategory::Forbidden => "Forbidden",
            ErrorCategory::NotFound => "Resource not found",
            ErrorCategory::MethodNotAllowed => "Method not allowed",
            ErrorCategory::Internal => "Internal error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Problem {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: Some(detail.into()),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub category: &'static str,
    pub time: String,
    pub problems: Vec<Problem>,
}

impl ApiErrorBody {
    pub fn new(code: String, category: ErrorCategory, problems: Vec<Problem>) -> Self {
        Self {
            code,
            category: category.label(),
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            problems,
        }
    }

    /// Serialize with the given status. Falls back to a bare status if the
    /// body cannot be written.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        match serde_json::to_vec(&self) {
            Ok(bytes) => (
                status,
                [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                bytes,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(code = %self.code, error = %err, "failed to write error body");
                status.into_response()
            }
        }
    }
}

/// What went wrong, attached to an error response as an extension.
///
/// The problem middleware turns it into an `ApiErrorBody` with a fresh code.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub category: ErrorCategory,
    pub problems: Vec<Problem>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request")]
    InvalidRequest(Vec<Problem>),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn invalid(problem: Problem) -> Self {
        AppError::InvalidRequest(vec![problem])
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::InvalidRequest(_) | AppError::InvalidCredentials => {
                ErrorCategory::InvalidRequest
            }
            AppError::Unauthorized => ErrorCategory::Unauthorized,
            AppError::Forbidden => ErrorCategory::Forbidden,
            AppError::NotFound(_) => ErrorCategory::NotFound,
            AppError::MethodNotAllowed => ErrorCategory::MethodNotAllowed,
            AppError::Internal => ErrorCategory::Internal,
        }
    }

    fn into_problems(self) -> Vec<Problem> {
        match self {
            AppError::InvalidRequest(problems) => problems,
            AppError::InvalidCredentials => vec![Problem::new(INVALID_CREDENTIALS)],
            AppError::Unauthorized => vec![Problem::new("You must be authenticated")],
            AppError::Forbidden => vec![Problem::new("Access denied")],
            AppError::NotFound(what) => vec![Problem::new(what)],
            AppError::MethodNotAllowed => vec![Problem::new("Method not allowed")],
            AppError::Internal => vec![Problem::new("Unexpected error")],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let category = self.category();
        let report = ErrorReport {
            category,
            problems: self.into_problems(),
        };

        (category.status(), Extension(report)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if err.is_credential_failure() {
            AppError::InvalidCredentials
        } else {
            tracing::error!(error = %err, "authentication failed unexpectedly");
            AppError::Internal
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        tracing::error!(error = %err, "repository error");
        AppError::Internal
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid(Problem::with_detail("Invalid request body", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::invalid(Problem::with_detail("Invalid path", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::invalid(Problem::with_detail("Invalid query", rejection.body_text()))
    }
}

/*
 * Responsibility
 * - POST /auth/token: credentials in, signed access token out
 * - the token goes both in the JSON body and in the Authorization header
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};

use crate::api::v1::dto::{credentials::CredentialsRequest, token::TokenResponse};
use crate::error::AppError;
use crate::services::auth::authenticator::BEARER_PREFIX;
use crate::state::AppState;

pub async fn issue_token(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate().map_err(AppError::InvalidRequest)?;

    tracing::debug!(login = %req.login, "[POST] authenticate user");

    let issued = state.auth.authenticate(&req.login, &req.password).await?;

    let bearer = HeaderValue::from_str(&format!("{BEARER_PREFIX}{}", issued.access_token))
        .map_err(|_| AppError::Internal)?;

    Ok((
        StatusCode::OK,
        [(header::AUTHORIZATION, bearer)],
        Json(TokenResponse::from(issued)),
    ))
}

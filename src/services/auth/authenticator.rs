use std::sync::Arc;

use axum::http::{HeaderMap, header::AUTHORIZATION};
use tracing::debug;

use crate::services::auth::principal::Principal;
use crate::services::auth::token_codec::TokenCodec;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Turns the `Authorization` header of a request into an optional principal.
///
/// Never fails: a missing, malformed, forged or expired token simply leaves
/// the request anonymous and authorization decides what that means.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    codec: Arc<TokenCodec>,
}

impl RequestAuthenticator {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// The token after a case-sensitive `"Bearer "` prefix, if non-empty.
    pub fn resolve_token(headers: &HeaderMap) -> Option<&str> {
        headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix(BEARER_PREFIX)
            .filter(|token| !token.is_empty())
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Option<Principal> {
        self.authenticate_at(headers, chrono::Utc::now().timestamp())
    }

    pub fn authenticate_at(&self, headers: &HeaderMap, now: i64) -> Option<Principal> {
        let token = Self::resolve_token(headers)?;
        match self.codec.decode_at(token, now) {
            Ok(claims) => Some(Principal::from_claims(claims, token)),
            Err(err) => {
                debug!(error = %err, "bearer token rejected, continuing anonymously");
                None
            }
        }
    }
}

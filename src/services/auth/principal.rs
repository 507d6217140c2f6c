use std::collections::BTreeSet;

use crate::services::auth::token_codec::Claims;

/// Coarse-grained authority labels carried in tokens.
pub mod authority {
    pub const ROLE_USER: &str = "ROLE_USER";
    pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
}

/// Authenticated identity for the duration of one request.
///
/// Inserted into request extensions by the authentication middleware and
/// dropped with the request.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
    authorities: BTreeSet<String>,
    raw_token: String,
}

impl std::fmt::Debug for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The raw token is a live credential.
        f.debug_struct("Principal")
            .field("subject", &self.subject)
            .field("authorities", &self.authorities)
            .finish_non_exhaustive()
    }
}

impl Principal {
    pub fn new(
        subject: impl Into<String>,
        authorities: impl IntoIterator<Item = impl Into<String>>,
        raw_token: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
            raw_token: raw_token.into(),
        }
    }

    pub fn from_claims(claims: Claims, raw_token: &str) -> Self {
        Self::new(claims.subject, claims.authorities, raw_token)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn authorities(&self) -> &BTreeSet<String> {
        &self.authorities
    }

    /// Original bearer string, kept for credential propagation.
    pub fn raw_token(&self) -> &str {
        &self.raw_token
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    pub fn has_any_authority(&self, required: &BTreeSet<String>) -> bool {
        !self.authorities.is_disjoint(required)
    }
}

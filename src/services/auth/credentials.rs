/*
 * Responsibility
 * - check a (login, password) pair against the user store
 * - unknown logins and wrong passwords cost the same: both run exactly one
 *   hash verification, so response latency does not reveal which logins exist
 */
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::repos::{RepoError, UserAuthData, UserRepo};
use crate::services::auth::password::{HashError, PasswordHasher};
use crate::services::auth::token_codec::TokenError;

// Verified against when the login is unknown. Its value never matters.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-logins";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user not found")]
    NotFound,

    #[error("bad credentials")]
    BadCredentials,

    #[error(transparent)]
    Store(#[from] RepoError),

    #[error("password verification task failed")]
    Verification,

    #[error("cannot issue token: {0}")]
    Issuance(#[from] TokenError),
}

impl AuthError {
    /// Failures a client may be told about, always as the same generic message.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, AuthError::NotFound | AuthError::BadCredentials)
    }
}

pub struct CredentialVerifier {
    users: Arc<dyn UserRepo>,
    hasher: Arc<dyn PasswordHasher>,
    dummy_hash: String,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserRepo>, hasher: Arc<dyn PasswordHasher>) -> Result<Self, HashError> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            users,
            hasher,
            dummy_hash,
        })
    }

    pub async fn verify(&self, login: &str, password: &str) -> Result<UserAuthData, AuthError> {
        let user = if login.trim().is_empty() {
            None
        } else {
            self.users.find_by_login(login).await?
        };

        let hash = user
            .as_ref()
            .map_or_else(|| self.dummy_hash.clone(), |u| u.password_hash.clone());
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();

        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|_| AuthError::Verification)?;

        match user {
            None => {
                debug!(login, "login rejected: unknown user");
                Err(AuthError::NotFound)
            }
            Some(_) if !matches => {
                debug!(login, "login rejected: password mismatch");
                Err(AuthError::BadCredentials)
            }
            Some(user) => Ok(user),
        }
    }
}

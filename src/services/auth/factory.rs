/// Factory: wire the authentication components around one signing key.
use std::sync::Arc;

use thiserror::Error;

use crate::repos::UserRepo;
use crate::services::auth::{
    AuthorizationPolicy, CredentialVerifier, HashError, PasswordHasher, PolicyError,
    RequestAuthenticator, SigningKey, TokenCodec, TokenIssuer,
};

#[derive(Debug, Error)]
pub enum AuthSetupError {
    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Everything the HTTP layer needs for authentication and authorization.
pub struct AuthComponents {
    pub issuer: Arc<TokenIssuer>,
    pub authenticator: Arc<RequestAuthenticator>,
    pub policy: Arc<AuthorizationPolicy>,
}

pub fn build_auth(
    key: SigningKey,
    validity_seconds: u64,
    users: Arc<dyn UserRepo>,
    hasher: Arc<dyn PasswordHasher>,
) -> Result<AuthComponents, AuthSetupError> {
    let codec = Arc::new(TokenCodec::new(key));
    let verifier = CredentialVerifier::new(users, hasher)?;

    Ok(AuthComponents {
        issuer: Arc::new(TokenIssuer::new(verifier, Arc::clone(&codec), validity_seconds)),
        authenticator: Arc::new(RequestAuthenticator::new(codec)),
        policy: Arc::new(AuthorizationPolicy::standard()?),
    })
}

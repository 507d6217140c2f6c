use std::sync::Arc;

use tracing::info;

use crate::services::auth::credentials::{AuthError, CredentialVerifier};
use crate::services::auth::token_codec::TokenCodec;

pub const TOKEN_TYPE: &str = "Bearer";

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
    pub token_type: &'static str,
}

/// Exchanges credentials for a signed access token.
pub struct TokenIssuer {
    verifier: CredentialVerifier,
    codec: Arc<TokenCodec>,
    validity_seconds: u64,
}

impl TokenIssuer {
    pub fn new(verifier: CredentialVerifier, codec: Arc<TokenCodec>, validity_seconds: u64) -> Self {
        Self {
            verifier,
            codec,
            validity_seconds,
        }
    }

    pub async fn authenticate(&self, login: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let user = self.verifier.verify(login, password).await?;

        let now = chrono::Utc::now().timestamp();
        let access_token = self.codec.encode(
            &user.login,
            user.authorities.as_slice(),
            now,
            self.validity_seconds,
        )?;

        info!(login = %user.login, authorities = ?user.authorities, "access token issued");

        Ok(IssuedToken {
            access_token,
            expires_in: self.validity_seconds,
            token_type: TOKEN_TYPE,
        })
    }
}

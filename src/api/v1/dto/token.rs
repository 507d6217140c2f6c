use serde::Serialize;

use crate::services::auth::IssuedToken;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    /// Seconds until expiry.
    pub expires_in: u64,
    /// Always "Bearer".
    pub token_type: &'static str,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.access_token,
            expires_in: issued.expires_in,
            token_type: issued.token_type,
        }
    }
}

/*
 * Responsibility
 * - shared context for handlers and middleware (AppState)
 * - cheap to Clone: every member sits behind an Arc
 */
use std::sync::Arc;

use crate::repos::BoatRepo;
use crate::services::ErrorCodeGenerator;
use crate::services::auth::{AuthComponents, AuthorizationPolicy, RequestAuthenticator, TokenIssuer};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<TokenIssuer>,
    pub authenticator: Arc<RequestAuthenticator>,
    pub policy: Arc<AuthorizationPolicy>,
    pub error_codes: Arc<ErrorCodeGenerator>,
    pub boats: Arc<dyn BoatRepo>,
}

impl AppState {
    pub fn new(auth: AuthComponents, boats: Arc<dyn BoatRepo>) -> Self {
        Self {
            auth: auth.issuer,
            authenticator: auth.authenticator,
            policy: auth.policy,
            error_codes: Arc::new(ErrorCodeGenerator::new()),
            boats,
        }
    }
}

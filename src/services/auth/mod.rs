pub mod authenticator;
pub mod credentials;
pub mod factory;
pub mod password;
pub mod policy;
pub mod principal;
pub mod signing_key;
pub mod token_codec;
pub mod token_issuer;

pub use authenticator::RequestAuthenticator;
pub use credentials::{AuthError, CredentialVerifier};
pub use factory::{AuthComponents, AuthSetupError, build_auth};
pub use password::{BcryptHasher, HashError, PasswordHasher};
pub use policy::{Access, AuthorizationPolicy, Decision, DenyReason, PathPattern, PolicyError};
pub use principal::{Principal, authority};
pub use signing_key::{KeyError, SigningKey};
pub use token_codec::{Claims, TokenCodec, TokenError};
pub use token_issuer::{IssuedToken, TokenIssuer};

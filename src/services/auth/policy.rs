//! Ordered (method, path) → access rules.
//!
//! The first rule whose method and path pattern both match decides. A request
//! that matches no rule is denied.

use std::collections::BTreeSet;

use axum::http::Method;
use thiserror::Error;

use crate::services::auth::principal::{Principal, authority};

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid path pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: matchit::InsertError,
    },
}

#[derive(Clone)]
enum Matcher {
    /// matchit route syntax, e.g. `/api/v1/boats/{id}`.
    Route(matchit::Router<()>),
    /// The prefix itself and everything below it on a segment boundary.
    Prefix(String),
}

/// Path half of a rule.
#[derive(Clone)]
pub struct PathPattern {
    source: String,
    matcher: Matcher,
}

impl std::fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PathPattern").field(&self.source).finish()
    }
}

impl PathPattern {
    /// A single route; `{param}` segments match any one segment.
    pub fn route(pattern: &str) -> Result<Self, PolicyError> {
        let mut router = matchit::Router::new();
        router
            .insert(pattern, ())
            .map_err(|source| PolicyError::Pattern {
                pattern: pattern.to_owned(),
                source,
            })?;

        Ok(Self {
            source: pattern.to_owned(),
            matcher: Matcher::Route(router),
        })
    }

    /// `/api` matches `/api`, `/api/` and `/api/anything/below`, but not `/apis`.
    pub fn prefix(prefix: &str) -> Self {
        let trimmed = prefix.trim_end_matches('/');
        Self {
            source: format!("{trimmed}/**"),
            matcher: Matcher::Prefix(trimmed.to_owned()),
        }
    }

    /// Every path.
    pub fn any() -> Self {
        Self::prefix("/")
    }

    pub fn matches(&self, path: &str) -> bool {
        match &self.matcher {
            Matcher::Route(router) => router.at(path).is_ok(),
            Matcher::Prefix(prefix) => {
                prefix.is_empty()
                    || path == prefix
                    || path
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

/// What a matching rule demands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    /// An authenticated principal holding at least one of these.
    AnyOf(BTreeSet<String>),
    DenyAll,
}

impl Access {
    pub fn any_of<I, S>(authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Access::AnyOf(authorities.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
pub struct AuthorityRule {
    /// `None` matches every method.
    method: Option<Method>,
    pattern: PathPattern,
    access: Access,
}

impl AuthorityRule {
    pub fn new(method: Option<Method>, pattern: PathPattern, access: Access) -> Self {
        Self {
            method,
            pattern,
            access,
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().is_none_or(|m| m == method) && self.pattern.matches(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No authenticated principal: answered with 401.
    NoPrincipal,
    /// Authenticated but lacking the authority: answered with 403.
    InsufficientAuthority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
    rules: Vec<AuthorityRule>,
}

impl AuthorizationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, method: Option<Method>, pattern: PathPattern, access: Access) -> Self {
        self.rules.push(AuthorityRule::new(method, pattern, access));
        self
    }

    /// Access table of the boats backend.
    pub fn standard() -> Result<Self, PolicyError> {
        let api = || PathPattern::prefix("/api");
        let admin = || Access::any_of([authority::ROLE_ADMIN]);

        Ok(Self::new()
            .rule(Some(Method::POST), PathPattern::route("/auth/token")?, Access::Public)
            .rule(Some(Method::GET), PathPattern::route("/health")?, Access::Public)
            .rule(
                Some(Method::GET),
                api(),
                Access::any_of([authority::ROLE_USER, authority::ROLE_ADMIN]),
            )
            .rule(Some(Method::POST), api(), admin())
            .rule(Some(Method::PUT), api(), admin())
            .rule(Some(Method::DELETE), api(), admin())
            .rule(None, PathPattern::any(), Access::DenyAll))
    }

    pub fn authorize(&self, method: &Method, path: &str, principal: Option<&Principal>) -> Decision {
        let access = self
            .rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map_or(&Access::DenyAll, |rule| &rule.access);

        match (access, principal) {
            (Access::Public, _) => Decision::Allow,
            (Access::AnyOf(required), Some(p)) if p.has_any_authority(required) => Decision::Allow,
            (_, None) => Decision::Deny(DenyReason::NoPrincipal),
            (_, Some(_)) => Decision::Deny(DenyReason::InsufficientAuthority),
        }
    }
}

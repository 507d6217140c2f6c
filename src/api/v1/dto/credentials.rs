/*
 * Responsibility
 * - POST /auth/token request body
 * - field validation: one Problem per invalid field
 */
use serde::Deserialize;

use crate::error::Problem;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

impl CredentialsRequest {
    pub fn validate(&self) -> Result<(), Vec<Problem>> {
        let problems: Vec<Problem> = [
            check_field("login", &self.login, 3, 50),
            check_field("password", &self.password, 4, 50),
        ]
        .into_iter()
        .flatten()
        .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

pub(crate) fn check_field(name: &str, value: &str, min: usize, max: usize) -> Option<Problem> {
    let error = format!("Invalid '{name}'");
    if value.trim().is_empty() {
        return Some(Problem::with_detail(error, "must not be blank"));
    }

    let len = value.chars().count();
    if !(min..=max).contains(&len) {
        return Some(Problem::with_detail(
            error,
            format!("size must be between {min} and {max}"),
        ));
    }

    None
}

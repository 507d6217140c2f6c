/*
 * Responsibility
 * - credential lookup by login (password hash + authorities)
 * - the Postgres implementation reads `_user` joined with `_user_authority`
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

/// What the credential check needs to know about a user.
#[derive(Clone)]
pub struct UserAuthData {
    pub login: String,
    pub password_hash: String,
    pub authorities: Vec<String>,
}

impl std::fmt::Debug for UserAuthData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAuthData")
            .field("login", &self.login)
            .field("authorities", &self.authorities)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// `Ok(None)` when no user has this login.
    async fn find_by_login(&self, login: &str) -> RepoResult<Option<UserAuthData>>;
}

#[derive(Debug, FromRow)]
struct UserAuthorityRow {
    login: String,
    password: String,
    authority_name: String,
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_login(&self, login: &str) -> RepoResult<Option<UserAuthData>> {
        // One row per granted authority; a user without any authority is not
        // eligible to log in and is reported as absent.
        let rows = sqlx::query_as::<_, UserAuthorityRow>(
            r#"
            SELECT login AS login, password_hash AS password, authority_name AS authority_name
            FROM _user
            INNER JOIN _user_authority ua ON ua.user_id = _user.id
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_all(&self.db)
        .await?;

        let mut rows = rows.into_iter();
        let Some(first) = rows.next() else {
            return Ok(None);
        };

        let mut authorities = vec![first.authority_name];
        authorities.extend(rows.map(|r| r.authority_name));

        Ok(Some(UserAuthData {
            login: first.login,
            password_hash: first.password,
            authorities,
        }))
    }
}

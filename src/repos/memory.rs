//! In-process repositories.
//!
//! Used by the HTTP tests and handy for local experiments without Postgres.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::repos::boat_repo::{BoatRepo, BoatRow, NewBoat};
use crate::repos::error::RepoResult;
use crate::repos::user_repo::{UserAuthData, UserRepo};

#[derive(Debug, Default)]
pub struct InMemoryUserRepo {
    users: HashMap<String, UserAuthData>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// `password_hash` must already be hashed with the configured hasher.
    pub fn with_user(
        mut self,
        login: &str,
        password_hash: impl Into<String>,
        authorities: &[&str],
    ) -> Self {
        self.users.insert(
            login.to_owned(),
            UserAuthData {
                login: login.to_owned(),
                password_hash: password_hash.into(),
                authorities: authorities.iter().map(|a| (*a).to_owned()).collect(),
            },
        );
        self
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_by_login(&self, login: &str) -> RepoResult<Option<UserAuthData>> {
        Ok(self.users.get(login).cloned())
    }
}

#[derive(Debug, Default)]
struct BoatTable {
    last_id: i64,
    rows: BTreeMap<i64, BoatRow>,
}

#[derive(Debug, Default)]
pub struct InMemoryBoatRepo {
    table: Mutex<BoatTable>,
}

impl InMemoryBoatRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_table<T>(&self, f: impl FnOnce(&mut BoatTable) -> T) -> T {
        // A panic while holding the lock cannot leave a half-written row.
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut table)
    }
}

#[async_trait]
impl BoatRepo for InMemoryBoatRepo {
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<BoatRow>> {
        let skip = usize::try_from(offset).unwrap_or(0);
        let take = usize::try_from(limit).unwrap_or(0);
        Ok(self.with_table(|t| t.rows.values().skip(skip).take(take).cloned().collect()))
    }

    async fn get(&self, id: i64) -> RepoResult<Option<BoatRow>> {
        Ok(self.with_table(|t| t.rows.get(&id).cloned()))
    }

    async fn create(&self, boat: &NewBoat) -> RepoResult<BoatRow> {
        Ok(self.with_table(|t| {
            t.last_id += 1;
            let row = BoatRow {
                id: t.last_id,
                name: boat.name.clone(),
                description: boat.description.clone(),
                img_name: None,
            };
            t.rows.insert(row.id, row.clone());
            row
        }))
    }

    async fn update(&self, id: i64, boat: &NewBoat) -> RepoResult<Option<BoatRow>> {
        Ok(self.with_table(|t| {
            t.rows.get_mut(&id).map(|row| {
                row.name = boat.name.clone();
                row.description = boat.description.clone();
                row.clone()
            })
        }))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.with_table(|t| t.rows.remove(&id).is_some()))
    }
}

/*
 * Responsibility
 * - boats CRUD
 * - ids come from `boat_sequence`; `img_name` is read but never written here
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BoatRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub img_name: Option<String>,
}

/// Writable boat fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBoat {
    pub name: String,
    pub description: Option<String>,
}

#[async_trait]
pub trait BoatRepo: Send + Sync {
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<BoatRow>>;
    async fn get(&self, id: i64) -> RepoResult<Option<BoatRow>>;
    async fn create(&self, boat: &NewBoat) -> RepoResult<BoatRow>;
    /// `Ok(None)` when the boat does not exist.
    async fn update(&self, id: i64, boat: &NewBoat) -> RepoResult<Option<BoatRow>>;
    /// `Ok(false)` when there was nothing to delete.
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgBoatRepo {
    db: PgPool,
}

impl PgBoatRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BoatRepo for PgBoatRepo {
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<BoatRow>> {
        let rows = sqlx::query_as::<_, BoatRow>(
            r#"
            SELECT id, name, description, img_name
            FROM boats
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<BoatRow>> {
        let row = sqlx::query_as::<_, BoatRow>(
            r#"
            SELECT id, name, description, img_name
            FROM boats
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn create(&self, boat: &NewBoat) -> RepoResult<BoatRow> {
        let row = sqlx::query_as::<_, BoatRow>(
            r#"
            INSERT INTO boats (id, name, description)
            VALUES (nextval('boat_sequence'), $1, $2)
            RETURNING id, name, description, img_name
            "#,
        )
        .bind(&boat.name)
        .bind(boat.description.as_deref())
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: i64, boat: &NewBoat) -> RepoResult<Option<BoatRow>> {
        let row = sqlx::query_as::<_, BoatRow>(
            r#"
            UPDATE boats
            SET name = $2, description = $3
            WHERE id = $1
            RETURNING id, name, description, img_name
            "#,
        )
        .bind(id)
        .bind(&boat.name)
        .bind(boat.description.as_deref())
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM boats
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

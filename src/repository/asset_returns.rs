//! Return requests repository for database operations

use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{asset_return::AssetReturn, enums::ReturnState},
};

const COLUMNS: &str = "id, assignment_id, state, returned_date, version, created_at";

#[derive(Clone)]
pub struct AssetReturnsRepository {
    pool: Pool<Postgres>,
}

impl AssetReturnsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get return request by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<AssetReturn> {
        let query = format!("SELECT {COLUMNS} FROM asset_returns WHERE id = $1");
        sqlx::query_as::<_, AssetReturn>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::ReturnRequestNotFound)
    }

    /// Most recently created return request for an assignment, if any
    pub async fn latest_for_assignment(&self, assignment_id: Uuid) -> AppResult<Option<AssetReturn>> {
        let query = format!(
            "SELECT {COLUMNS} FROM asset_returns \
             WHERE assignment_id = $1 \
             ORDER BY created_at DESC \
             LIMIT 1"
        );
        let latest = sqlx::query_as::<_, AssetReturn>(&query)
            .bind(assignment_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(latest)
    }

    /// Insert a new return request in WAITING_FOR_RETURNING.
    ///
    /// A partial unique index allows at most one waiting request per
    /// assignment; losing a race to another insert surfaces as
    /// `ReturnRequestAlreadyExists`.
    pub async fn insert(&self, assignment_id: Uuid) -> AppResult<AssetReturn> {
        let query = format!(
            "INSERT INTO asset_returns (assignment_id, state) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, AssetReturn>(&query)
            .bind(assignment_id)
            .bind(ReturnState::WaitingForReturning)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::ReturnRequestAlreadyExists
                }
                _ => AppError::from(err),
            })?;

        Ok(created)
    }

    /// Version-checked state transition. `None` on conflict.
    pub async fn update_state(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        state: ReturnState,
        returned_date: Option<NaiveDate>,
        expected_version: i64,
    ) -> AppResult<Option<AssetReturn>> {
        let query = format!(
            "UPDATE asset_returns \
             SET state = $2, returned_date = $3, version = version + 1 \
             WHERE id = $1 AND version = $4 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, AssetReturn>(&query)
            .bind(id)
            .bind(state)
            .bind(returned_date)
            .bind(expected_version)
            .fetch_optional(conn)
            .await?;

        Ok(updated)
    }
}

//! Assignments repository for database operations

use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        assignment::{Assignment, NewAssignment},
        enums::AssignmentStatus,
    },
};

const COLUMNS: &str = "id, user_id, asset_id, assigned_date, status, note, version, created_at";

#[derive(Clone)]
pub struct AssignmentsRepository {
    pool: Pool<Postgres>,
}

impl AssignmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get assignment by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Assignment> {
        let query = format!("SELECT {COLUMNS} FROM assignments WHERE id = $1");
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::AssignmentNotFound)
    }

    /// Read an assignment under an exclusive row lock inside the caller's
    /// transaction. Returns `None` when the row is already gone so the
    /// caller can name the condition (e.g. already deleted).
    pub async fn get_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> AppResult<Option<Assignment>> {
        let query = format!("SELECT {COLUMNS} FROM assignments WHERE id = $1 FOR UPDATE");
        let assignment = sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(assignment)
    }

    /// Insert a new assignment in WAITING_FOR_ACCEPTANCE
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        request: &NewAssignment,
    ) -> AppResult<Assignment> {
        let query = format!(
            "INSERT INTO assignments (user_id, asset_id, assigned_date, status, note) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let assignment = sqlx::query_as::<_, Assignment>(&query)
            .bind(request.user_id)
            .bind(request.asset_id)
            .bind(request.assigned_date)
            .bind(AssignmentStatus::WaitingForAcceptance)
            .bind(&request.note)
            .fetch_one(conn)
            .await?;

        Ok(assignment)
    }

    /// Version-checked update of the mutable fields. `None` on conflict.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        user_id: Uuid,
        asset_id: Uuid,
        assigned_date: NaiveDate,
        note: Option<&str>,
        expected_version: i64,
    ) -> AppResult<Option<Assignment>> {
        let query = format!(
            "UPDATE assignments \
             SET user_id = $2, asset_id = $3, assigned_date = $4, note = $5, version = version + 1 \
             WHERE id = $1 AND version = $6 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .bind(user_id)
            .bind(asset_id)
            .bind(assigned_date)
            .bind(note)
            .bind(expected_version)
            .fetch_optional(conn)
            .await?;

        Ok(updated)
    }

    /// Version-checked status transition. `None` on conflict.
    pub async fn update_status(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: AssignmentStatus,
        expected_version: i64,
    ) -> AppResult<Option<Assignment>> {
        let query = format!(
            "UPDATE assignments SET status = $2, version = version + 1 \
             WHERE id = $1 AND version = $3 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .bind(status)
            .bind(expected_version)
            .fetch_optional(conn)
            .await?;

        Ok(updated)
    }

    /// Version-checked hard delete. Returns false on conflict.
    pub async fn delete(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        expected_version: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1 AND version = $2")
            .bind(id)
            .bind(expected_version)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether the asset appears in any assignment, past or present
    pub async fn exists_for_asset(&self, conn: &mut PgConnection, asset_id: Uuid) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM assignments WHERE asset_id = $1)")
                .bind(asset_id)
                .fetch_one(conn)
                .await?;

        Ok(exists)
    }
}

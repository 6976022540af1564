//! Sequence counter repository.
//!
//! All mutation runs inside a caller-owned transaction so the row lock
//! taken by `get_for_update` spans the whole read-increment-write cycle.

use sqlx::PgConnection;

use crate::models::sequence::SequenceCounter;

#[derive(Clone)]
pub struct SequencesRepository;

impl SequencesRepository {
    pub fn new() -> Self {
        Self
    }

    /// Create the counter row for `key` if it does not exist yet.
    pub async fn ensure(&self, conn: &mut PgConnection, key: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO sequence_counters (key, last_value) VALUES ($1, 0) \
             ON CONFLICT (key) DO NOTHING",
        )
        .bind(key)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Read the counter row under an exclusive lock, failing fast when
    /// another transaction already holds it (SQLSTATE 55P03).
    pub async fn get_for_update(
        &self,
        conn: &mut PgConnection,
        key: &str,
    ) -> Result<SequenceCounter, sqlx::Error> {
        sqlx::query_as::<_, SequenceCounter>(
            "SELECT key, last_value, version FROM sequence_counters \
             WHERE key = $1 FOR UPDATE NOWAIT",
        )
        .bind(key)
        .fetch_one(conn)
        .await
    }

    /// Persist the incremented value. The row is held under the lock taken
    /// by `get_for_update`, so the version compare cannot fail here.
    pub async fn store(
        &self,
        conn: &mut PgConnection,
        key: &str,
        next: i32,
        expected_version: i64,
    ) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sequence_counters SET last_value = $2, version = version + 1 \
             WHERE key = $1 AND version = $3",
        )
        .bind(key)
        .bind(next)
        .bind(expected_version)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }
}

impl Default for SequencesRepository {
    fn default() -> Self {
        Self::new()
    }
}

//! Code allocation service.
//!
//! Issues unique, strictly increasing numeric suffixes per allocation key
//! (one key per category prefix, plus a fixed key for staff codes). Each
//! allocation reads the counter row under an exclusive lock, increments it
//! and commits; lock contention is retried a bounded number of times before
//! it becomes a fatal allocation failure.

use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    repository::Repository,
};

/// Fixed allocation key and prefix for staff codes
const STAFF_CODE_KEY: &str = "SD";

/// Lock-conflict retry bound and fixed backoff
const MAX_ATTEMPTS: u32 = 4;
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Format an asset code: category prefix plus the counter value padded to
/// six digits. Values past the pad width are emitted at full width.
pub fn format_asset_code(prefix: &str, number: i32) -> String {
    format!("{}{:06}", prefix, number)
}

/// Format a staff code: "SD" plus the counter value padded to four digits
pub fn format_staff_code(number: i32) -> String {
    format!("{}{:04}", STAFF_CODE_KEY, number)
}

#[derive(Clone)]
pub struct CodesService {
    repository: Repository,
}

impl CodesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Allocate the next value for `key`.
    ///
    /// Serialized per key by the row lock: concurrent callers observe a
    /// contiguous, strictly increasing run with no duplicates. On lock
    /// contention the whole attempt is retried up to four times with a
    /// fixed delay; exhaustion is fatal and the caller must not fabricate
    /// a code.
    pub async fn allocate(&self, key: &str) -> AppResult<i32> {
        if key.trim().is_empty() {
            tracing::error!("allocation key is null or empty");
            return Err(AppError::CategoryPrefixEmpty);
        }

        let mut attempt = 1;
        loop {
            match self.try_allocate(key).await {
                Ok(next) => return Ok(next),
                Err(err) if is_lock_conflict(&err) => {
                    if attempt >= MAX_ATTEMPTS {
                        tracing::error!(key, "sequence counter still locked after {} attempts", attempt);
                        return Err(AppError::AllocatorContention(key.to_string()));
                    }
                    tracing::warn!(key, attempt, "sequence counter locked, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Allocate and format the next asset code for a category prefix
    pub async fn next_asset_code(&self, prefix: &str) -> AppResult<String> {
        let next = self.allocate(prefix).await?;
        Ok(format_asset_code(prefix, next))
    }

    /// Allocate and format the next staff code
    pub async fn next_staff_code(&self) -> AppResult<String> {
        let next = self.allocate(STAFF_CODE_KEY).await?;
        Ok(format_staff_code(next))
    }

    /// One read-increment-write cycle in its own transaction. The counter
    /// row is created lazily on first allocation for a new key.
    async fn try_allocate(&self, key: &str) -> Result<i32, sqlx::Error> {
        let mut tx = self.repository.pool.begin().await?;

        self.repository.sequences.ensure(&mut tx, key).await?;
        let counter = self.repository.sequences.get_for_update(&mut tx, key).await?;

        let next = counter.last_value + 1;
        self.repository
            .sequences
            .store(&mut tx, key, next, counter.version)
            .await?;

        tx.commit().await?;
        Ok(next)
    }
}

/// Postgres reports a failed `FOR UPDATE NOWAIT` as SQLSTATE 55P03
fn is_lock_conflict(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("55P03"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_code_is_zero_padded_to_six_digits() {
        assert_eq!(format_asset_code("LA", 1), "LA000001");
        assert_eq!(format_asset_code("LA", 2), "LA000002");
        assert_eq!(format_asset_code("MO", 999999), "MO999999");
    }

    #[test]
    fn asset_code_past_pad_width_is_not_truncated() {
        assert_eq!(format_asset_code("LA", 1_000_000), "LA1000000");
        assert_eq!(format_asset_code("LA", 12_345_678), "LA12345678");
    }

    #[test]
    fn staff_code_is_zero_padded_to_four_digits() {
        assert_eq!(format_staff_code(1), "SD0001");
        assert_eq!(format_staff_code(42), "SD0042");
        assert_eq!(format_staff_code(9999), "SD9999");
        assert_eq!(format_staff_code(10000), "SD10000");
    }
}

//! Sequence counter backing human-readable codes

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row per allocation key. `last_value` only ever grows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SequenceCounter {
    pub key: String,
    pub last_value: i32,
    pub version: i64,
}

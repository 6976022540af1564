//! Return request model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::ReturnState;

/// A request to hand back an assigned asset.
///
/// `returned_date` is set only when the request completes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssetReturn {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub state: ReturnState,
    pub returned_date: Option<NaiveDate>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

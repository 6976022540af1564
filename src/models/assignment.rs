//! Assignment model and request types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::enums::AssignmentStatus;

/// Assignment model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub asset_id: Uuid,
    pub assigned_date: NaiveDate,
    pub status: AssignmentStatus,
    pub note: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

/// Create assignment request
#[derive(Debug, Deserialize, Validate)]
pub struct NewAssignment {
    pub user_id: Uuid,
    pub asset_id: Uuid,
    pub assigned_date: NaiveDate,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Update assignment request, only valid while waiting for acceptance
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAssignment {
    pub user_id: Uuid,
    pub asset_id: Uuid,
    pub assigned_date: NaiveDate,
    #[validate(length(max = 500))]
    pub note: Option<String>,
    pub version: i64,
}

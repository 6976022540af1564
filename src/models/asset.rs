//! Asset model and request types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::enums::AssetState;

/// Asset model from database.
///
/// `code` is allocated once at creation and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub specification: String,
    pub installed_date: NaiveDate,
    pub state: AssetState,
    pub category_id: Uuid,
    pub location_id: Uuid,
    pub version: i64,
}

/// Create asset request
#[derive(Debug, Deserialize, Validate)]
pub struct NewAsset {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 2000))]
    pub specification: String,
    pub installed_date: NaiveDate,
    pub category_id: Uuid,
}

/// Update asset request.
///
/// Carries the version the client last read; a stale version is rejected
/// as a concurrent modification.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 2000))]
    pub specification: String,
    pub installed_date: NaiveDate,
    pub state: AssetState,
    pub version: i64,
}

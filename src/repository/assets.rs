//! Assets repository for database operations

use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        asset::{Asset, NewAsset, UpdateAsset},
        enums::AssetState,
    },
};

const COLUMNS: &str =
    "id, code, name, specification, installed_date, state, category_id, location_id, version";

#[derive(Clone)]
pub struct AssetsRepository {
    pool: Pool<Postgres>,
}

impl AssetsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get asset by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Asset> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::AssetNotFound)
    }

    /// Read an asset under an exclusive row lock inside the caller's
    /// transaction. Availability checks must go through this read so two
    /// racing assignment attempts cannot both observe AVAILABLE.
    pub async fn get_for_update(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<Asset> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or(AppError::AssetNotFound)
    }

    /// Insert a new asset with its allocated code, in state AVAILABLE
    pub async fn insert(
        &self,
        request: &NewAsset,
        code: &str,
        category_id: Uuid,
        location_id: Uuid,
    ) -> AppResult<Asset> {
        let query = format!(
            "INSERT INTO assets (code, name, specification, installed_date, state, category_id, location_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let asset = sqlx::query_as::<_, Asset>(&query)
            .bind(code)
            .bind(&request.name)
            .bind(&request.specification)
            .bind(request.installed_date)
            .bind(AssetState::Available)
            .bind(category_id)
            .bind(location_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(asset)
    }

    /// Version-checked field update. Returns `None` when the stored version
    /// no longer matches, i.e. the row was modified concurrently.
    pub async fn update_fields(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        request: &UpdateAsset,
    ) -> AppResult<Option<Asset>> {
        let query = format!(
            "UPDATE assets \
             SET name = $2, specification = $3, installed_date = $4, state = $5, version = version + 1 \
             WHERE id = $1 AND version = $6 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&request.name)
            .bind(&request.specification)
            .bind(request.installed_date)
            .bind(request.state)
            .bind(request.version)
            .fetch_optional(conn)
            .await?;

        Ok(updated)
    }

    /// Version-checked state flip used by the assignment and return flows.
    /// Returns the new version so chained writes in the same transaction
    /// can keep their compares consistent; `None` signals a conflict.
    pub async fn set_state(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        state: AssetState,
        expected_version: i64,
    ) -> AppResult<Option<i64>> {
        let new_version = sqlx::query_scalar::<_, i64>(
            "UPDATE assets SET state = $2, version = version + 1 \
             WHERE id = $1 AND version = $3 \
             RETURNING version",
        )
        .bind(id)
        .bind(state)
        .bind(expected_version)
        .fetch_optional(conn)
        .await?;

        Ok(new_version)
    }

    /// Version-checked hard delete. Returns false when the row is gone or
    /// was modified concurrently.
    pub async fn delete(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        expected_version: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1 AND version = $2")
            .bind(id)
            .bind(expected_version)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

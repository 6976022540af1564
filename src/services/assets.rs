//! Asset lifecycle service

use sqlx::PgConnection;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        asset::{Asset, NewAsset, UpdateAsset},
        enums::AssetState,
        user::CurrentUser,
    },
    repository::Repository,
    services::codes::CodesService,
};

#[derive(Clone)]
pub struct AssetsService {
    repository: Repository,
    codes: CodesService,
}

impl AssetsService {
    pub fn new(repository: Repository, codes: CodesService) -> Self {
        Self { repository, codes }
    }

    /// Get asset by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Asset> {
        self.repository.assets.get_by_id(id).await
    }

    /// Create a new asset at the acting user's location.
    ///
    /// The code is allocated from the sequence keyed by the category prefix
    /// and is immutable afterwards.
    pub async fn create(&self, current: &CurrentUser, request: NewAsset) -> AppResult<Asset> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let category = self
            .repository
            .categories
            .find_by_id(request.category_id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;

        let code = self.codes.next_asset_code(&category.prefix).await?;
        let asset = self
            .repository
            .assets
            .insert(&request, &code, category.id, current.location_id)
            .await?;

        tracing::info!(user = %current.username, asset = %asset.id, code = %asset.code, "asset created");
        Ok(asset)
    }

    /// Update an asset's editable fields.
    ///
    /// Allowed only for assets at the acting user's location and only while
    /// the asset is not assigned. The patch carries the version the client
    /// last read; a stale version surfaces as a concurrent modification.
    ///
    /// The target state is not constrained here, so a patch can write any
    /// state including ASSIGNED without going through an assignment.
    pub async fn update(
        &self,
        current: &CurrentUser,
        id: Uuid,
        request: UpdateAsset,
    ) -> AppResult<Asset> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut tx = self.repository.pool.begin().await?;

        let asset = self.repository.assets.get_for_update(&mut tx, id).await?;
        self.validate_editable(current, &asset)?;

        let updated = self
            .repository
            .assets
            .update_fields(&mut tx, id, &request)
            .await?
            .ok_or_else(|| {
                tracing::error!(asset = %id, "asset is being modified by another transaction");
                AppError::AssetBeingModified
            })?;

        tx.commit().await?;

        tracing::info!(user = %current.username, asset = %id, "asset updated");
        Ok(updated)
    }

    /// Delete an asset.
    ///
    /// Allowed only for assets at the acting user's location that have never
    /// appeared in any assignment. A concurrent modification during delete
    /// is reported as not-found: the row is already gone from the caller's
    /// point of view.
    pub async fn delete(&self, current: &CurrentUser, id: Uuid) -> AppResult<()> {
        let mut tx = self.repository.pool.begin().await?;

        let asset = self.repository.assets.get_for_update(&mut tx, id).await?;

        if asset.location_id != current.location_id {
            tracing::warn!(user = %current.username, asset = %id, "asset delete rejected: location mismatch");
            return Err(AppError::LocationMismatch);
        }

        if self
            .repository
            .assignments
            .exists_for_asset(&mut tx, id)
            .await?
        {
            tracing::warn!(asset = %id, "asset delete rejected: assignment history exists");
            return Err(AppError::AssetNotDeletable);
        }

        let deleted = self
            .repository
            .assets
            .delete(&mut tx, id, asset.version)
            .await?;
        if !deleted {
            return Err(AppError::AssetNotFound);
        }

        tx.commit().await?;

        tracing::info!(user = %current.username, asset = %id, "asset deleted");
        Ok(())
    }

    /// Pure availability predicate
    pub fn is_available(&self, asset: &Asset) -> bool {
        asset.state.is_available()
    }

    /// Unconditional state flip used by the assignment and return flows
    /// inside their own transactions. Returns the asset's new version.
    pub(crate) async fn set_state(
        &self,
        conn: &mut PgConnection,
        asset_id: Uuid,
        state: AssetState,
        expected_version: i64,
    ) -> AppResult<i64> {
        self.repository
            .assets
            .set_state(conn, asset_id, state, expected_version)
            .await?
            .ok_or_else(|| {
                tracing::error!(asset = %asset_id, "asset is being modified by another transaction");
                AppError::AssetBeingModified
            })
    }

    fn validate_editable(&self, current: &CurrentUser, asset: &Asset) -> AppResult<()> {
        if asset.location_id != current.location_id {
            tracing::warn!(user = %current.username, asset = %asset.id, "asset edit rejected: location mismatch");
            return Err(AppError::LocationMismatch);
        }

        if asset.state.is_assigned() {
            tracing::warn!(asset = %asset.id, "asset edit rejected: currently assigned");
            return Err(AppError::AssetNotEditable);
        }

        Ok(())
    }
}

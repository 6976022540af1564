//! Assignment lifecycle service

use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        assignment::{Assignment, NewAssignment, UpdateAssignment},
        enums::{AssetState, AssignmentStatus},
        user::CurrentUser,
    },
    repository::Repository,
    services::assets::AssetsService,
};

/// Backdating an assigned date that has already elapsed is rejected
pub(crate) fn is_invalid_date_update(new_date: NaiveDate, old_date: NaiveDate, today: NaiveDate) -> bool {
    new_date < old_date && new_date < today
}

#[derive(Clone)]
pub struct AssignmentsService {
    repository: Repository,
    assets: AssetsService,
}

impl AssignmentsService {
    pub fn new(repository: Repository, assets: AssetsService) -> Self {
        Self { repository, assets }
    }

    /// Get assignment by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Assignment> {
        self.repository.assignments.get_by_id(id).await
    }

    /// Create an assignment for an available asset.
    ///
    /// The asset is read under an exclusive lock before the availability
    /// check, so two racing creates cannot both claim it. The assignment
    /// insert and the asset state flip commit together or not at all.
    pub async fn create(&self, current: &CurrentUser, request: NewAssignment) -> AppResult<Assignment> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repository
            .users
            .find_by_id(request.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let mut tx = self.repository.pool.begin().await?;

        let asset = self
            .repository
            .assets
            .get_for_update(&mut tx, request.asset_id)
            .await?;
        if !self.assets.is_available(&asset) {
            tracing::warn!(asset = %asset.id, state = %asset.state, "assignment rejected: asset not available");
            return Err(AppError::AssetNotAvailable);
        }

        let assignment = self.repository.assignments.insert(&mut tx, &request).await?;
        self.assets
            .set_state(&mut tx, asset.id, AssetState::Assigned, asset.version)
            .await?;

        tx.commit().await?;

        tracing::info!(user = %current.username, assignment = %assignment.id, asset = %asset.code, "assignment created");
        Ok(assignment)
    }

    /// Accept or decline a waiting assignment.
    ///
    /// Only an admin or the assignment's own user may act. Declining
    /// releases the asset back to AVAILABLE in the same transaction.
    pub async fn update_status(
        &self,
        current: &CurrentUser,
        id: Uuid,
        new_status: AssignmentStatus,
    ) -> AppResult<Assignment> {
        let assignment = self.repository.assignments.get_by_id(id).await?;

        if !current.is_admin() && assignment.user_id != current.id {
            tracing::warn!(user = %current.username, assignment = %id, "status update rejected: not the assignee");
            return Err(AppError::AccessDenied);
        }

        self.validate_waiting(&assignment, AppError::AssignmentNotUpdatable)?;

        if !matches!(new_status, AssignmentStatus::Accepted | AssignmentStatus::Declined) {
            return Err(AppError::InvalidAssignmentStatus(new_status.to_string()));
        }

        let mut tx = self.repository.pool.begin().await?;

        if new_status == AssignmentStatus::Declined {
            let asset = self
                .repository
                .assets
                .get_for_update(&mut tx, assignment.asset_id)
                .await?;
            self.assets
                .set_state(&mut tx, asset.id, AssetState::Available, asset.version)
                .await?;
        }

        let updated = self
            .repository
            .assignments
            .update_status(&mut tx, id, new_status, assignment.version)
            .await?
            .ok_or_else(|| {
                tracing::error!(assignment = %id, "assignment is being modified by another transaction");
                AppError::AssignmentBeingModified
            })?;

        tx.commit().await?;

        tracing::info!(user = %current.username, assignment = %id, status = %new_status, "assignment status updated");
        Ok(updated)
    }

    /// Rework a waiting assignment: new assignee, asset, date or note.
    ///
    /// The old asset is released and the requested asset claimed inside one
    /// transaction; the release/claim pair runs even when both are the same
    /// asset.
    pub async fn update(
        &self,
        current: &CurrentUser,
        id: Uuid,
        request: UpdateAssignment,
    ) -> AppResult<Assignment> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let assignment = self.repository.assignments.get_by_id(id).await?;
        self.validate_waiting(&assignment, AppError::AssignmentNotUpdatable)?;

        let today = Utc::now().date_naive();
        if is_invalid_date_update(request.assigned_date, assignment.assigned_date, today) {
            return Err(AppError::InvalidDateUpdate);
        }

        self.repository
            .users
            .find_by_id(request.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let mut tx = self.repository.pool.begin().await?;

        if request.asset_id == assignment.asset_id {
            let requested = self
                .repository
                .assets
                .get_for_update(&mut tx, request.asset_id)
                .await?;
            // Release and re-claim the held asset; idempotent on state but
            // keeps the version chain consistent.
            let released = self
                .assets
                .set_state(&mut tx, requested.id, AssetState::Available, requested.version)
                .await?;
            self.assets
                .set_state(&mut tx, requested.id, AssetState::Assigned, released)
                .await?;
        } else {
            // Lock the two assets in id order so concurrent updates swapping
            // them in opposite directions cannot deadlock.
            let (low, high) = if assignment.asset_id < request.asset_id {
                (assignment.asset_id, request.asset_id)
            } else {
                (request.asset_id, assignment.asset_id)
            };
            let low = self.repository.assets.get_for_update(&mut tx, low).await?;
            let high = self.repository.assets.get_for_update(&mut tx, high).await?;
            let (old, requested) = if low.id == assignment.asset_id {
                (low, high)
            } else {
                (high, low)
            };

            if !self.assets.is_available(&requested) {
                tracing::warn!(asset = %requested.id, "assignment update rejected: asset not available");
                return Err(AppError::AssetNotAvailable);
            }

            self.assets
                .set_state(&mut tx, old.id, AssetState::Available, old.version)
                .await?;
            self.assets
                .set_state(&mut tx, requested.id, AssetState::Assigned, requested.version)
                .await?;
        }

        let updated = self
            .repository
            .assignments
            .update(
                &mut tx,
                id,
                request.user_id,
                request.asset_id,
                request.assigned_date,
                request.note.as_deref(),
                request.version,
            )
            .await?
            .ok_or_else(|| {
                tracing::error!(assignment = %id, "assignment is being modified by another transaction");
                AppError::AssignmentBeingModified
            })?;

        tx.commit().await?;

        tracing::info!(user = %current.username, assignment = %id, "assignment updated");
        Ok(updated)
    }

    /// Delete a waiting assignment, releasing its asset
    pub async fn delete(&self, current: &CurrentUser, id: Uuid) -> AppResult<()> {
        let mut tx = self.repository.pool.begin().await?;

        let assignment = self
            .repository
            .assignments
            .get_for_update(&mut tx, id)
            .await?
            .ok_or(AppError::AssignmentAlreadyDeleted)?;

        self.validate_waiting(&assignment, AppError::AssignmentNotDeletable)?;

        let asset = self
            .repository
            .assets
            .get_for_update(&mut tx, assignment.asset_id)
            .await?;
        self.assets
            .set_state(&mut tx, asset.id, AssetState::Available, asset.version)
            .await?;

        let deleted = self
            .repository
            .assignments
            .delete(&mut tx, id, assignment.version)
            .await?;
        if !deleted {
            tracing::error!(assignment = %id, "assignment is being modified by another transaction");
            return Err(AppError::AssignmentBeingModified);
        }

        tx.commit().await?;

        tracing::info!(user = %current.username, assignment = %id, "assignment deleted");
        Ok(())
    }

    fn validate_waiting(&self, assignment: &Assignment, err: AppError) -> AppResult<()> {
        if !assignment.status.is_waiting_for_acceptance() {
            tracing::warn!(assignment = %assignment.id, status = %assignment.status, "assignment is not waiting for acceptance");
            return Err(err);
        }
        Ok(())
    }
}

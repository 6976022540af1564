//! Return request lifecycle service

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        asset_return::AssetReturn,
        enums::{AssetState, AssignmentStatus, ReturnState},
        user::CurrentUser,
    },
    repository::Repository,
    services::assets::AssetsService,
};

#[derive(Clone)]
pub struct AssetReturnsService {
    repository: Repository,
    assets: AssetsService,
}

impl AssetReturnsService {
    pub fn new(repository: Repository, assets: AssetsService) -> Self {
        Self { repository, assets }
    }

    /// Get return request by ID
    pub async fn get(&self, id: Uuid) -> AppResult<AssetReturn> {
        self.repository.asset_returns.get_by_id(id).await
    }

    /// Open a return request for an accepted assignment.
    ///
    /// At most one request per assignment may be waiting at a time, and a
    /// completed request permanently blocks further ones; only after a
    /// cancellation may a new request be opened.
    pub async fn create(&self, current: &CurrentUser, assignment_id: Uuid) -> AppResult<AssetReturn> {
        let assignment = self.repository.assignments.get_by_id(assignment_id).await?;

        if !current.is_admin() && assignment.user_id != current.id {
            tracing::warn!(user = %current.username, assignment = %assignment_id, "return request rejected: not the assignee");
            return Err(AppError::AccessDenied);
        }

        if assignment.status != AssignmentStatus::Accepted {
            tracing::warn!(assignment = %assignment_id, status = %assignment.status, "return request rejected: assignment not accepted");
            return Err(AppError::AssignmentNotAccepted);
        }

        if let Some(latest) = self
            .repository
            .asset_returns
            .latest_for_assignment(assignment_id)
            .await?
        {
            match latest.state {
                ReturnState::WaitingForReturning => return Err(AppError::ReturnRequestAlreadyExists),
                ReturnState::Completed => return Err(AppError::AssetAlreadyReturned),
                ReturnState::Canceled => {}
            }
        }

        let created = self.repository.asset_returns.insert(assignment_id).await?;

        tracing::info!(user = %current.username, assignment = %assignment_id, request = %created.id, "return request created");
        Ok(created)
    }

    /// Close a waiting return request.
    ///
    /// Completing it completes the assignment, stamps today's date and
    /// releases the asset; canceling it puts the assignment back to
    /// ACCEPTED and leaves the asset assigned. Both entity writes happen in
    /// one transaction, so observers never see one without the other.
    pub async fn transition(
        &self,
        current: &CurrentUser,
        return_id: Uuid,
        target: ReturnState,
    ) -> AppResult<AssetReturn> {
        let request = self.repository.asset_returns.get_by_id(return_id).await?;

        if !request.state.is_waiting_for_returning() {
            tracing::warn!(request = %return_id, state = %request.state, "return request is not updatable");
            return Err(AppError::ReturnNotUpdatable);
        }

        let assignment = self
            .repository
            .assignments
            .get_by_id(request.assignment_id)
            .await?;

        let mut tx = self.repository.pool.begin().await?;

        let updated = match target {
            ReturnState::Completed => {
                let asset = self
                    .repository
                    .assets
                    .get_for_update(&mut tx, assignment.asset_id)
                    .await?;

                self.repository
                    .assignments
                    .update_status(&mut tx, assignment.id, AssignmentStatus::Completed, assignment.version)
                    .await?
                    .ok_or(AppError::ReturnBeingModified)?;

                self.assets
                    .set_state(&mut tx, asset.id, AssetState::Available, asset.version)
                    .await?;

                let returned_date = Utc::now().date_naive();
                self.repository
                    .asset_returns
                    .update_state(&mut tx, return_id, ReturnState::Completed, Some(returned_date), request.version)
                    .await?
                    .ok_or(AppError::ReturnBeingModified)?
            }
            ReturnState::Canceled => {
                self.repository
                    .assignments
                    .update_status(&mut tx, assignment.id, AssignmentStatus::Accepted, assignment.version)
                    .await?
                    .ok_or(AppError::ReturnBeingModified)?;

                self.repository
                    .asset_returns
                    .update_state(&mut tx, return_id, ReturnState::Canceled, None, request.version)
                    .await?
                    .ok_or(AppError::ReturnBeingModified)?
            }
            other => return Err(AppError::InvalidReturnState(other.to_string())),
        };

        tx.commit().await?;

        tracing::info!(user = %current.username, request = %return_id, state = %target, "return request closed");
        Ok(updated)
    }
}

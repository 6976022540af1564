//! Business logic services

pub mod asset_returns;
pub mod assets;
pub mod assignments;
pub mod codes;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub codes: codes::CodesService,
    pub assets: assets::AssetsService,
    pub assignments: assignments::AssignmentsService,
    pub asset_returns: asset_returns::AssetReturnsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        let codes = codes::CodesService::new(repository.clone());
        let assets = assets::AssetsService::new(repository.clone(), codes.clone());
        let assignments =
            assignments::AssignmentsService::new(repository.clone(), assets.clone());
        let asset_returns =
            asset_returns::AssetReturnsService::new(repository.clone(), assets.clone());

        Self {
            codes,
            assets,
            assignments,
            asset_returns,
        }
    }
}

//! Repository layer for database operations

pub mod asset_returns;
pub mod assets;
pub mod assignments;
pub mod categories;
pub mod locations;
pub mod sequences;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding the database connection pool.
///
/// Multi-entity operations begin a transaction on `pool` and pass the
/// connection into the per-aggregate repositories.
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub assets: assets::AssetsRepository,
    pub assignments: assignments::AssignmentsRepository,
    pub asset_returns: asset_returns::AssetReturnsRepository,
    pub categories: categories::CategoriesRepository,
    pub locations: locations::LocationsRepository,
    pub users: users::UsersRepository,
    pub sequences: sequences::SequencesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            assets: assets::AssetsRepository::new(pool.clone()),
            assignments: assignments::AssignmentsRepository::new(pool.clone()),
            asset_returns: asset_returns::AssetReturnsRepository::new(pool.clone()),
            categories: categories::CategoriesRepository::new(pool.clone()),
            locations: locations::LocationsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            sequences: sequences::SequencesRepository::new(),
            pool,
        }
    }
}

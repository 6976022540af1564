//! Locations repository, read-only within this core

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{error::AppResult, models::location::Location};

#[derive(Clone)]
pub struct LocationsRepository {
    pool: Pool<Postgres>,
}

impl LocationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Location>> {
        let location = sqlx::query_as::<_, Location>("SELECT id, name FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(location)
    }
}

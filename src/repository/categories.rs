//! Categories repository, read-only within this core

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{error::AppResult, models::category::Category};

#[derive(Clone)]
pub struct CategoriesRepository {
    pool: Pool<Postgres>,
}

impl CategoriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, name, prefix FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(category)
    }
}

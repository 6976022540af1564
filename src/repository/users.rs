//! Users repository, read-only within this core

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{error::AppResult, models::user::User};

const COLUMNS: &str = "id, username, staff_code, role, location_id, version";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}

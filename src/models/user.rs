//! User model and the acting-user identity context

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::Role;

/// User model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub staff_code: Option<String>,
    pub role: Role,
    pub location_id: Uuid,
    pub version: i64,
}

/// Identity of the authenticated caller, resolved by the surrounding
/// application and passed into every mutating service operation. Location
/// scoping and admin-only checks are enforced against this value.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub location_id: Uuid,
    pub roles: Vec<Role>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            location_id: user.location_id,
            roles: vec![user.role],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_check_covers_all_roles() {
        let mut user = CurrentUser {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            location_id: Uuid::new_v4(),
            roles: vec![Role::Staff],
        };
        assert!(!user.is_admin());

        user.roles.push(Role::Admin);
        assert!(user.is_admin());
    }
}

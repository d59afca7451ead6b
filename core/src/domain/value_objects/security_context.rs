//! Authenticated identity consumed by authorization checks.

use serde::{Deserialize, Serialize};

use crate::domain::entities::user::{Role, UserId};

/// The (user, role) pair established by login or by a verified access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecurityContext {
    pub user_id: UserId,
    pub role: Role,
}

impl SecurityContext {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

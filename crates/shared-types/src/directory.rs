//! User directory port.
//!
//! Lets subsystems resolve a user id to a display name and role without
//! depending on the identity crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{Role, UserId};
use crate::errors::CareResult;

/// Minimal public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub approved: bool,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns `Ok(None)` for unknown ids.
    async fn lookup(&self, user_id: UserId) -> CareResult<Option<UserSummary>>;
}

//! Outbound (Driven) ports for the Identity subsystem.

use async_trait::async_trait;
use shared_types::{CareResult, Role, UserId};

use crate::domain::{Profile, User};

/// Row store for users and their profiles.
///
/// User and profile are written together; a user never exists without
/// its profile row.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    /// - `Conflict`: the email is already registered
    async fn insert(&self, user: User, profile: Profile) -> CareResult<()>;

    async fn get(&self, user_id: UserId) -> CareResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> CareResult<Option<User>>;

    async fn get_profile(&self, user_id: UserId) -> CareResult<Option<Profile>>;

    /// Replaces the user and profile rows in one write.
    async fn save(&self, user: User, profile: Profile) -> CareResult<()>;

    /// Sets the approval flag and returns the updated row.
    async fn set_approved(&self, user_id: UserId, approved: bool) -> CareResult<User>;

    async fn list(&self, role: Option<Role>, approved: Option<bool>) -> CareResult<Vec<User>>;
}

/// Password verification collaborator.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn set_password(&self, user_id: UserId, email: &str, password: &str) -> CareResult<()>;

    /// Returns the user id when the pair matches.
    async fn verify(&self, email: &str, password: &str) -> CareResult<Option<UserId>>;
}

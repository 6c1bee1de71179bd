//! # Inbound Port - IdentityApi
//!
//! | Method | Authorized Caller |
//! |--------|-------------------|
//! | `sign_up` | anyone (unauthenticated) |
//! | `authenticate` | anyone (unauthenticated) |
//! | `approve_user` | admin |
//! | `update_profile` | the user themself |
//! | `get_profile` | the user themself, admin |
//! | `list_pending_approvals` | admin |

use async_trait::async_trait;
use shared_types::{Actor, Audited, CareResult, UserId};

use crate::domain::{Credentials, Profile, ProfileUpdate, SignUp, User};

#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Registers a user. Patients and donors are approved immediately.
    ///
    /// # Errors
    /// - `Validation`: malformed email, short password, admin role
    /// - `Conflict`: email already registered
    async fn sign_up(&self, request: SignUp) -> CareResult<Audited<User>>;

    /// Resolves credentials to the acting identity.
    ///
    /// # Errors
    /// - `Forbidden`: unknown email or wrong password
    async fn authenticate(&self, credentials: Credentials) -> CareResult<Actor>;

    /// Current approval flag of a user.
    async fn is_approved(&self, user_id: UserId) -> CareResult<bool>;

    /// Re-reads the user so the actor carries the current approval flag.
    async fn resolve_actor(&self, user_id: UserId) -> CareResult<Actor>;

    /// Sets `approved = true`. Approving an approved user is a no-op success.
    async fn approve_user(&self, actor: &Actor, user_id: UserId) -> CareResult<Audited<User>>;

    async fn update_profile(
        &self,
        actor: &Actor,
        update: ProfileUpdate,
    ) -> CareResult<Audited<(User, Profile)>>;

    async fn get_profile(&self, actor: &Actor, user_id: UserId) -> CareResult<(User, Profile)>;

    /// Hospitals and sponsors awaiting approval.
    async fn list_pending_approvals(&self, actor: &Actor) -> CareResult<Vec<User>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // The trait must stay object-safe (usable as dyn IdentityApi)
    fn _assert_object_safe(_: &dyn IdentityApi) {}
}

//! Identity Service - sign-up, approval and profile management.

use std::sync::Arc;

use async_trait::async_trait;
use hc_05_access_policy::rules;
use shared_types::{
    record_best_effort, Actor, AuditAction, AuditOutcome, AuditEntry, AuditSink, Audited, CareError,
    CareResult, Role, TimeSource, UserDirectory, UserId, UserSummary,
};
use tracing::{info, instrument};

use crate::domain::{normalize_email, Credentials, Profile, ProfileUpdate, SignUp, User};
use crate::ports::{CredentialStore, IdentityApi, UserRepository};

/// Identity service over a user store and a credential store.
pub struct IdentityService<R, C>
where
    R: UserRepository,
    C: CredentialStore,
{
    users: Arc<R>,
    credentials: Arc<C>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn TimeSource>,
}

impl<R, C> IdentityService<R, C>
where
    R: UserRepository,
    C: CredentialStore,
{
    pub fn new(
        users: Arc<R>,
        credentials: Arc<C>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            users,
            credentials,
            audit,
            clock,
        }
    }

    /// Creates an approved admin account. Used by the runtime bootstrap only.
    pub async fn provision_admin(&self, email: &str, password: &str, name: &str) -> CareResult<User> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            if existing.role == Role::Admin {
                return Ok(existing);
            }
            return Err(CareError::conflict(format!(
                "{} is registered with role {}",
                existing.email, existing.role
            )));
        }
        let now = self.clock.now();
        let user = User {
            id: UserId::new(),
            email: normalize_email(email),
            name: name.trim().to_string(),
            role: Role::Admin,
            approved: true,
            created_at: now,
        };
        self.users
            .insert(user.clone(), Profile::empty(user.id, Role::Admin, now))
            .await?;
        self.credentials.set_password(user.id, email, password).await?;
        info!(user_id = %user.id, "Provisioned admin account");
        Ok(user)
    }

    async fn require_user(&self, user_id: UserId) -> CareResult<User> {
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| CareError::not_found("user", user_id))
    }

    async fn require_profile(&self, user: &User) -> CareResult<Profile> {
        Ok(self
            .users
            .get_profile(user.id)
            .await?
            .unwrap_or_else(|| Profile::empty(user.id, user.role, user.created_at)))
    }
}

#[async_trait]
impl<R, C> IdentityApi for IdentityService<R, C>
where
    R: UserRepository,
    C: CredentialStore,
{
    #[instrument(skip(self, request), fields(role = %request.role))]
    async fn sign_up(&self, request: SignUp) -> CareResult<Audited<User>> {
        request.validate().into_result()?;

        let now = self.clock.now();
        let user = User {
            id: UserId::new(),
            email: normalize_email(&request.email),
            name: request.name.trim().to_string(),
            role: request.role,
            approved: request.role.auto_approved(),
            created_at: now,
        };
        let mut profile = Profile::empty(user.id, user.role, now);
        profile.phone = request.phone;
        if let Some(details) = request.details {
            profile.details = details;
        }

        self.users.insert(user.clone(), profile).await?;
        self.credentials
            .set_password(user.id, &user.email, &request.password)
            .await?;

        care_telemetry::USERS_REGISTERED
            .with_label_values(&[user.role.as_str()])
            .inc();
        info!(user_id = %user.id, approved = user.approved, "User signed up");

        let actor = Actor::new(user.id, user.role, user.approved);
        let audit = record_best_effort(
            self.audit.as_ref(),
            AuditEntry::new(&actor, AuditAction::UserSignedUp, now)
                .with_metadata("approved", user.approved),
        )
        .await;

        Ok(Audited { value: user, audit })
    }

    async fn authenticate(&self, credentials: Credentials) -> CareResult<Actor> {
        let user_id = self
            .credentials
            .verify(&credentials.email, &credentials.password)
            .await?
            .ok_or_else(|| CareError::forbidden("invalid email or password"))?;
        self.resolve_actor(user_id).await
    }

    async fn is_approved(&self, user_id: UserId) -> CareResult<bool> {
        Ok(self.require_user(user_id).await?.approved)
    }

    async fn resolve_actor(&self, user_id: UserId) -> CareResult<Actor> {
        let user = self.require_user(user_id).await?;
        Ok(Actor::new(user.id, user.role, user.approved))
    }

    #[instrument(skip(self, actor), fields(admin = %actor.user_id))]
    async fn approve_user(&self, actor: &Actor, user_id: UserId) -> CareResult<Audited<User>> {
        rules::identity::approve(actor).require(actor, "approve users")?;

        let user = self.require_user(user_id).await?;
        if user.approved {
            // Re-approval is an idempotent success.
            return Ok(Audited {
                value: user,
                audit: AuditOutcome::Skipped,
            });
        }

        let user = self.users.set_approved(user_id, true).await?;
        care_telemetry::USERS_APPROVED.inc();
        info!(user_id = %user.id, role = %user.role, "User approved");

        let audit = record_best_effort(
            self.audit.as_ref(),
            AuditEntry::new(actor, AuditAction::UserApproved, self.clock.now())
                .with_target(user.id)
                .with_metadata("approved_role", user.role.as_str()),
        )
        .await;

        Ok(Audited { value: user, audit })
    }

    async fn update_profile(
        &self,
        actor: &Actor,
        update: ProfileUpdate,
    ) -> CareResult<Audited<(User, Profile)>> {
        rules::identity::update_profile(actor, actor.user_id)
            .require(actor, "update this profile")?;

        let mut user = self.require_user(actor.user_id).await?;
        update.validate(user.role).into_result()?;
        let mut profile = self.require_profile(&user).await?;

        let now = self.clock.now();
        update.apply(&mut user, &mut profile, now);
        self.users.save(user.clone(), profile.clone()).await?;

        let audit = record_best_effort(
            self.audit.as_ref(),
            AuditEntry::new(actor, AuditAction::ProfileUpdated, now),
        )
        .await;

        Ok(Audited {
            value: (user, profile),
            audit,
        })
    }

    async fn get_profile(&self, actor: &Actor, user_id: UserId) -> CareResult<(User, Profile)> {
        rules::identity::read_profile(actor, user_id).require(actor, "read this profile")?;
        let user = self.require_user(user_id).await?;
        let profile = self.require_profile(&user).await?;
        Ok((user, profile))
    }

    async fn list_pending_approvals(&self, actor: &Actor) -> CareResult<Vec<User>> {
        rules::identity::list_users(actor).require(actor, "list users")?;
        Ok(self
            .users
            .list(None, Some(false))
            .await?
            .into_iter()
            .filter(|u| matches!(u.role, Role::Hospital | Role::Sponsor))
            .collect())
    }
}

#[async_trait]
impl<R, C> UserDirectory for IdentityService<R, C>
where
    R: UserRepository,
    C: CredentialStore,
{
    async fn lookup(&self, user_id: UserId) -> CareResult<Option<UserSummary>> {
        Ok(self.users.get(user_id).await?.map(|user| UserSummary {
            id: user.id,
            name: user.name,
            role: user.role,
            approved: user.approved,
        }))
    }
}

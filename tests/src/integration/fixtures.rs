//! # Test Fixtures
//!
//! A fully wired runtime on a pinned clock, plus helpers that walk users
//! through sign-up and approval the way a client would.

use std::sync::Arc;

use care_runtime::{CareApi, RuntimeConfig, ServiceContainer};
use hc_01_identity::{Credentials, PasswordHashing, SignUp};
use hc_02_donor_registry::{ContactInput, DonorRegistration};
use hc_03_cases::{CaseView, NewCase};
use shared_types::{Actor, Amount, AuditSink, FixedTimeSource, Role};

pub const ADMIN_EMAIL: &str = "admin@carebridge.test";
pub const PASSWORD: &str = "integration-pass";

/// Start of every fixture clock (2024-01-01T00:00:00Z).
pub const EPOCH: u64 = 1_704_067_200_000;

pub struct World {
    pub api: CareApi,
    pub admin: Actor,
    pub clock: Arc<FixedTimeSource>,
}

impl World {
    pub async fn new() -> Self {
        Self::with_config(RuntimeConfig::default()).await
    }

    pub async fn with_config(config: RuntimeConfig) -> Self {
        let clock = Arc::new(FixedTimeSource::new(EPOCH));
        let container = ServiceContainer::with_clock(admin_config(config), clock.clone());
        Self::boot(container, clock).await
    }

    /// Runtime whose services audit into `sink`.
    pub async fn with_sink(sink: Arc<dyn AuditSink>) -> Self {
        let clock = Arc::new(FixedTimeSource::new(EPOCH));
        let container =
            ServiceContainer::with_audit_sink(admin_config(RuntimeConfig::default()), clock.clone(), sink);
        Self::boot(container, clock).await
    }

    async fn boot(container: ServiceContainer, clock: Arc<FixedTimeSource>) -> Self {
        let api = CareApi::new(Arc::new(container));
        api.bootstrap_admin().await.unwrap().unwrap();
        let admin = api
            .authenticate(Credentials::new(ADMIN_EMAIL, PASSWORD))
            .await
            .unwrap();
        Self { api, admin, clock }
    }

    /// Signs up and, for hospitals and sponsors, gets approved by the admin.
    pub async fn join(&self, role: Role, name: &str) -> Actor {
        let actor = self.join_pending(role, name).await;
        if actor.approved {
            return actor;
        }
        self.api.approve_user(&self.admin, actor.user_id).await.unwrap();
        self.api.authenticate(credentials(name)).await.unwrap()
    }

    /// Signs up without any admin approval.
    pub async fn join_pending(&self, role: Role, name: &str) -> Actor {
        self.api
            .sign_up(SignUp::new(&email(name), PASSWORD, name, role))
            .await
            .unwrap();
        self.api.authenticate(credentials(name)).await.unwrap()
    }

    /// Living donor offering `organs`, consenting in the same step.
    pub async fn consenting_donor(&self, name: &str, organs: &[&str]) -> Actor {
        let donor = self.join(Role::Donor, name).await;
        self.api
            .register_donor(&donor, living_registration(organs, true))
            .await
            .unwrap();
        donor
    }

    pub async fn open_case(&self, patient: &Actor, organ: &str, goal: Amount) -> CaseView {
        self.clock.advance(1_000);
        self.api
            .create_case(patient, new_case(organ, "high", goal))
            .await
            .unwrap()
            .value
    }
}

fn admin_config(mut config: RuntimeConfig) -> RuntimeConfig {
    config.bootstrap.admin_email = Some(ADMIN_EMAIL.to_string());
    config.bootstrap.admin_password = Some(PASSWORD.to_string());
    config.passwords = PasswordHashing::for_testing();
    config
}

pub fn email(name: &str) -> String {
    format!("{}@carebridge.test", name.to_lowercase().replace(' ', "."))
}

pub fn credentials(name: &str) -> Credentials {
    Credentials::new(&email(name), PASSWORD)
}

pub fn new_case(organ: &str, urgency: &str, goal: Amount) -> NewCase {
    NewCase {
        organ_needed: Some(organ.to_string()),
        urgency_level: Some(urgency.to_string()),
        blood_type: Some("O+".to_string()),
        age: Some(42),
        funding_goal: Some(goal),
        ..NewCase::default()
    }
}

pub fn living_registration(organs: &[&str], give_consent: bool) -> DonorRegistration {
    DonorRegistration {
        donor_type: Some("living".to_string()),
        blood_type: Some("O+".to_string()),
        age: Some(34),
        gender: Some("female".to_string()),
        medical_history: Some("No chronic conditions, non-smoker".to_string()),
        organs: organs.iter().map(|o| o.to_string()).collect(),
        give_consent,
        ..DonorRegistration::default()
    }
}

pub fn deceased_registration(organs: &[&str], contact: Option<ContactInput>) -> DonorRegistration {
    DonorRegistration {
        donor_type: Some("deceased".to_string()),
        blood_type: Some("A-".to_string()),
        organs: organs.iter().map(|o| o.to_string()).collect(),
        contacts: contact.into_iter().collect(),
        give_consent: true,
        ..DonorRegistration::default()
    }
}

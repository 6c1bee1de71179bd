//! # Service Container
//!
//! Holds every subsystem service and the adapters behind them.
//!
//! ## Initialization Order
//!
//! Services are built in dependency order:
//!
//! ```text
//! Level 0: Audit Log, time source (no dependencies)
//! Level 1: Identity (audit sink)
//! Level 2: Donor Registry (audit sink), Cases (identity as user directory)
//! Level 3: Funding Ledger (shares the case store with Cases)
//! ```
//!
//! ## Thread Safety
//!
//! - All services wrapped in `Arc` for shared ownership
//! - Adapters own their locks; services hold no mutable state of their own

use std::sync::Arc;

use tracing::{info, instrument};

use hc_01_identity::{InMemoryCredentialStore, InMemoryUserRepository, IdentityService};
use hc_02_donor_registry::{DonorRegistryService, InMemoryDonorRepository};
use hc_03_cases::{CaseService, InMemoryCaseRepository, InMemoryFileStore};
use hc_04_funding_ledger::{FundingLedger, InMemoryFundingStore};
use hc_06_audit_log::{AuditLogService, InMemoryAuditRepository};
use shared_types::{AuditSink, SystemTimeSource, TimeSource, UserDirectory};

use crate::container::config::RuntimeConfig;

/// Identity service over in-memory stores.
pub type ConcreteIdentityService = IdentityService<InMemoryUserRepository, InMemoryCredentialStore>;

/// Donor registry over an in-memory store.
pub type ConcreteDonorRegistry = DonorRegistryService<InMemoryDonorRepository>;

/// Case service over in-memory case and file stores.
pub type ConcreteCaseService = CaseService<InMemoryCaseRepository, InMemoryFileStore>;

/// Funding ledger sharing the case store.
pub type ConcreteFundingLedger =
    FundingLedger<InMemoryFundingStore<InMemoryCaseRepository>, InMemoryCaseRepository>;

/// Audit log over an in-memory store.
pub type ConcreteAuditLog = AuditLogService<InMemoryAuditRepository>;

/// Central container holding all service instances.
pub struct ServiceContainer {
    /// Identity (Subsystem 1). Also serves as the user directory.
    pub identity: Arc<ConcreteIdentityService>,

    /// Donor Registry (Subsystem 2).
    pub donors: Arc<ConcreteDonorRegistry>,

    /// Cases (Subsystem 3).
    pub cases: Arc<ConcreteCaseService>,

    /// Funding Ledger (Subsystem 4).
    pub funding: Arc<ConcreteFundingLedger>,

    /// Audit Log (Subsystem 6).
    pub audit_log: Arc<ConcreteAuditLog>,

    /// Sink every service writes audit entries to.
    pub audit_sink: Arc<dyn AuditSink>,

    /// Case store shared by Cases and the Funding Ledger.
    pub case_store: Arc<InMemoryCaseRepository>,

    /// Attachment store.
    pub file_store: Arc<InMemoryFileStore>,

    /// Runtime configuration (immutable after initialization).
    pub config: RuntimeConfig,
}

impl ServiceContainer {
    /// Create a container on the wall clock, auditing into the audit log.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemTimeSource))
    }

    /// Create a container with a caller-supplied time source.
    pub fn with_clock(config: RuntimeConfig, clock: Arc<dyn TimeSource>) -> Self {
        Self::build(config, clock, None)
    }

    /// Create a container whose services audit into `sink` instead of the
    /// audit log. The audit log stays queryable but receives nothing.
    pub fn with_audit_sink(
        config: RuntimeConfig,
        clock: Arc<dyn TimeSource>,
        sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self::build(config, clock, Some(sink))
    }

    /// ## Initialization Phases
    ///
    /// 1. Audit log and shared stores
    /// 2. Identity
    /// 3. Donor registry and cases
    /// 4. Funding ledger
    #[instrument(name = "service_init", skip_all)]
    fn build(
        config: RuntimeConfig,
        clock: Arc<dyn TimeSource>,
        sink: Option<Arc<dyn AuditSink>>,
    ) -> Self {
        info!("Initializing CareBridge service container");

        // =====================================================================
        // PHASE 1: Level 0 - No Dependencies
        // =====================================================================
        let audit_log = Arc::new(AuditLogService::new(Arc::new(InMemoryAuditRepository::new())));
        let audit_sink: Arc<dyn AuditSink> = match sink {
            Some(sink) => sink,
            None => audit_log.clone() as Arc<dyn AuditSink>,
        };
        let case_store = Arc::new(InMemoryCaseRepository::new());
        let file_store = Arc::new(InMemoryFileStore::new(&config.storage.file_base_url));
        info!("  [6] Audit Log initialized");

        // =====================================================================
        // PHASE 2: Level 1 - Identity
        // =====================================================================
        let identity = Arc::new(IdentityService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryCredentialStore::with_hashing(config.passwords.clone())),
            audit_sink.clone(),
            clock.clone(),
        ));
        let directory: Arc<dyn UserDirectory> = identity.clone();
        info!("  [1] Identity initialized");

        // =====================================================================
        // PHASE 3: Level 2 - Donor Registry, Cases
        // =====================================================================
        let donors = Arc::new(DonorRegistryService::new(
            Arc::new(InMemoryDonorRepository::new()),
            audit_sink.clone(),
            clock.clone(),
        ));
        info!("  [2] Donor Registry initialized");

        let cases = Arc::new(CaseService::new(
            case_store.clone(),
            file_store.clone(),
            directory,
            audit_sink.clone(),
            clock.clone(),
            config.cases.clone(),
        ));
        info!(
            "  [3] Cases initialized (max {} files of {} bytes)",
            config.cases.max_files_per_case, config.cases.max_file_bytes
        );

        // =====================================================================
        // PHASE 4: Level 3 - Funding Ledger
        // =====================================================================
        let funding = Arc::new(FundingLedger::new(
            Arc::new(InMemoryFundingStore::new(case_store.clone())),
            case_store.clone(),
            audit_sink.clone(),
            clock,
        ));
        info!("  [4] Funding Ledger initialized");

        info!("All services initialized successfully");

        Self {
            identity,
            donors,
            cases,
            funding,
            audit_log,
            audit_sink,
            case_store,
            file_store,
            config,
        }
    }
}

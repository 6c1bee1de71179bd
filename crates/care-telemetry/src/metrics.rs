//! Prometheus metrics for CareBridge subsystems.
//!
//! All metrics follow the naming convention: `care_<subsystem>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, IntCounter, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // IDENTITY
    // =========================================================================

    /// Users registered, by role
    pub static ref USERS_REGISTERED: CounterVec = CounterVec::new(
        Opts::new("care_identity_users_registered_total", "Users registered"),
        &["role"]
    ).expect("metric creation failed");

    /// Users approved by an admin
    pub static ref USERS_APPROVED: IntCounter = IntCounter::new(
        "care_identity_users_approved_total",
        "Hospital and sponsor accounts approved"
    ).expect("metric creation failed");

    // =========================================================================
    // CASES
    // =========================================================================

    /// Cases created by patients
    pub static ref CASES_CREATED: IntCounter = IntCounter::new(
        "care_cases_created_total",
        "Transplant cases created"
    ).expect("metric creation failed");

    /// Case status transitions
    pub static ref CASE_TRANSITIONS: CounterVec = CounterVec::new(
        Opts::new("care_cases_transitions_total", "Case status transitions"),
        &["from", "to"]
    ).expect("metric creation failed");

    // =========================================================================
    // FUNDING
    // =========================================================================

    /// Funding contributions accepted
    pub static ref CONTRIBUTIONS: IntCounter = IntCounter::new(
        "care_funding_contributions_total",
        "Funding contributions appended to the ledger"
    ).expect("metric creation failed");

    /// Sum of contributed amounts
    pub static ref FUNDS_CONTRIBUTED: Counter = Counter::new(
        "care_funding_amount_total",
        "Total amount contributed across all cases"
    ).expect("metric creation failed");

    // =========================================================================
    // DONORS
    // =========================================================================

    /// Consent changes (given / withdrawn)
    pub static ref CONSENT_CHANGES: CounterVec = CounterVec::new(
        Opts::new("care_donor_consent_changes_total", "Donor consent changes"),
        &["change"]
    ).expect("metric creation failed");

    /// Organ status transitions, by target status
    pub static ref ORGAN_TRANSITIONS: CounterVec = CounterVec::new(
        Opts::new("care_donor_organ_transitions_total", "Offered organ status changes"),
        &["to"]
    ).expect("metric creation failed");

    // =========================================================================
    // ACCESS & AUDIT
    // =========================================================================

    /// Access policy denials, by actor role
    pub static ref ACCESS_DENIED: CounterVec = CounterVec::new(
        Opts::new("care_access_denied_total", "Operations denied by the access policy"),
        &["role"]
    ).expect("metric creation failed");

    /// Audit entries appended
    pub static ref AUDIT_ENTRIES: IntCounter = IntCounter::new(
        "care_audit_entries_total",
        "Audit entries appended"
    ).expect("metric creation failed");

    /// Audit writes that failed and were swallowed
    pub static ref AUDIT_FAILURES: IntCounter = IntCounter::new(
        "care_audit_failures_total",
        "Audit writes that failed without failing the operation"
    ).expect("metric creation failed");
}

/// Handle proving the metrics are registered.
#[derive(Debug, Clone, Copy)]
pub struct MetricsHandle {
    pub registered: usize,
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already-registered collectors are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Identity
        Box::new(USERS_REGISTERED.clone()),
        Box::new(USERS_APPROVED.clone()),
        // Cases
        Box::new(CASES_CREATED.clone()),
        Box::new(CASE_TRANSITIONS.clone()),
        // Funding
        Box::new(CONTRIBUTIONS.clone()),
        Box::new(FUNDS_CONTRIBUTED.clone()),
        // Donors
        Box::new(CONSENT_CHANGES.clone()),
        Box::new(ORGAN_TRANSITIONS.clone()),
        // Access & audit
        Box::new(ACCESS_DENIED.clone()),
        Box::new(AUDIT_ENTRIES.clone()),
        Box::new(AUDIT_FAILURES.clone()),
    ];

    let mut registered = 0;
    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) => registered += 1,
            Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle { registered })
}

/// Render all registered metrics in the Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

//! # CareBridge Runtime
//!
//! The main entry point for the CareBridge coordination backend.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then `CARE_*` environment overrides)
//! 2. Initialize logging and metrics
//! 3. Validate configuration (bootstrap admin, attachment limits)
//! 4. Initialize services in dependency order (Level 0 → Level 3)
//! 5. Provision the bootstrap admin
//! 6. Signal ready and wait for Ctrl+C
//!
//! ## Subsystems
//!
//! 1. Identity (hc-01) - Accounts, approval, profiles
//! 2. Donor Registry (hc-02) - Donor records and consent
//! 3. Cases (hc-03) - Transplant case lifecycle
//! 4. Funding Ledger (hc-04) - Sponsor contributions
//! 5. Access Policy (hc-05) - Role rules (library, no state)
//! 6. Audit Log (hc-06) - Append-only action history

use std::sync::Arc;

use anyhow::{Context, Result};
use care_runtime::{CareApi, RuntimeConfig, ServiceContainer};
use care_telemetry::{gather_metrics, init_telemetry};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = RuntimeConfig::from_env().context("failed to load configuration")?;

    // Initialize logging and metrics
    let _telemetry =
        init_telemetry(&config.telemetry).context("failed to initialize telemetry")?;

    config.validate().context("invalid configuration")?;
    info!(
        environment = %config.telemetry.environment,
        require_funding_for_funded = config.cases.require_funding_for_funded,
        "Starting CareBridge"
    );

    // Create the services and the admin account
    let api = CareApi::new(Arc::new(ServiceContainer::new(config)));
    api.bootstrap_admin()
        .await
        .context("failed to provision bootstrap admin")?;

    info!("CareBridge is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    if let Ok(metrics) = gather_metrics() {
        debug!(metrics = %metrics, "Final metrics snapshot");
    }
    info!("CareBridge stopped");

    Ok(())
}

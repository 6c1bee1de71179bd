//! # Care Telemetry
//!
//! Structured logging and Prometheus metrics for CareBridge.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use care_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CARE_SERVICE_NAME` | `carebridge` | Service name in logs |
//! | `CARE_LOG_LEVEL` | `info` | Log level filter |
//! | `CARE_JSON_LOGS` | `false` | JSON formatted output |
//! | `CARE_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging, LoggingHandle};
pub use metrics::{
    gather_metrics, register_metrics, MetricsHandle, ACCESS_DENIED, AUDIT_ENTRIES,
    AUDIT_FAILURES, CASES_CREATED, CASE_TRANSITIONS, CONSENT_CHANGES, CONTRIBUTIONS,
    FUNDS_CONTRIBUTED, ORGAN_TRANSITIONS, REGISTRY, USERS_APPROVED, USERS_REGISTERED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize metrics and the global log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    let logging = init_logging(config)?;

    Ok(TelemetryGuard {
        _logging: logging,
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active for the lifetime of the process.
pub struct TelemetryGuard {
    _logging: LoggingHandle,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry");
    }
}

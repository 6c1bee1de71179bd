//! # Runtime Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! Every value has a default; `CARE_*` environment variables override them.
//!
//! ## Production Requirements
//!
//! - A bootstrap admin account MUST be configured (email and password)
//! - The bootstrap admin password MUST meet the sign-up password length

use care_telemetry::TelemetryConfig;
use hc_01_identity::{PasswordHashing, MIN_PASSWORD_LEN};
use hc_03_cases::CaseConfig;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Case lifecycle and attachment limits.
    pub cases: CaseConfig,
    /// Attachment storage.
    pub storage: StorageConfig,
    /// Account created at startup.
    pub bootstrap: BootstrapConfig,
    /// argon2id cost for stored passwords.
    pub passwords: PasswordHashing,
    /// Logging and metrics.
    pub telemetry: TelemetryConfig,
}

impl RuntimeConfig {
    /// Validate configuration before serving.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - no bootstrap admin email or password is set
    /// - the bootstrap admin password is too short
    /// - the attachment limits are zero
    /// - argon2 rejects the password hashing parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        let email = self
            .bootstrap
            .admin_email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingAdminEmail)?;
        let password = self
            .bootstrap
            .admin_password
            .as_deref()
            .ok_or_else(|| ConfigError::MissingAdminPassword(email.to_string()))?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ConfigError::WeakAdminPassword {
                min_len: MIN_PASSWORD_LEN,
            });
        }
        if self.cases.max_file_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                var: "CARE_MAX_FILE_BYTES",
                value: "0".to_string(),
            });
        }
        if self.cases.max_files_per_case == 0 {
            return Err(ConfigError::InvalidValue {
                var: "CARE_MAX_FILES_PER_CASE",
                value: "0".to_string(),
            });
        }
        self.passwords
            .hasher()
            .map_err(|e| ConfigError::PasswordHashing(e.to_string()))?;
        Ok(())
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            telemetry: TelemetryConfig::from_env(),
            ..Self::default()
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Apply `CARE_*` overrides read through `lookup`.
    ///
    /// # Environment Variables
    ///
    /// - `CARE_REQUIRE_FUNDING_FOR_FUNDED`: gate manual moves to funded (default: false)
    /// - `CARE_MAX_FILE_BYTES`: per-attachment size limit (default: 10 MiB)
    /// - `CARE_MAX_FILES_PER_CASE`: attachments per case (default: 20)
    /// - `CARE_FILE_BASE_URL`: public prefix of stored attachments
    /// - `CARE_ADMIN_EMAIL`, `CARE_ADMIN_PASSWORD`, `CARE_ADMIN_NAME`: bootstrap admin
    /// - `CARE_PASSWORD_MEMORY_KIB`, `CARE_PASSWORD_ITERATIONS`, `CARE_PASSWORD_PARALLELISM`:
    ///   argon2id cost (default: 19 MiB, 2, 1)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CARE_REQUIRE_FUNDING_FOR_FUNDED") {
            self.cases.require_funding_for_funded =
                parse_flag(&v).ok_or_else(|| invalid("CARE_REQUIRE_FUNDING_FOR_FUNDED", &v))?;
        }
        if let Some(v) = lookup("CARE_MAX_FILE_BYTES") {
            self.cases.max_file_bytes = v
                .trim()
                .parse()
                .map_err(|_| invalid("CARE_MAX_FILE_BYTES", &v))?;
        }
        if let Some(v) = lookup("CARE_MAX_FILES_PER_CASE") {
            self.cases.max_files_per_case = v
                .trim()
                .parse()
                .map_err(|_| invalid("CARE_MAX_FILES_PER_CASE", &v))?;
        }
        if let Some(v) = lookup("CARE_FILE_BASE_URL") {
            self.storage.file_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("CARE_ADMIN_EMAIL") {
            self.bootstrap.admin_email = Some(v);
        }
        if let Some(v) = lookup("CARE_ADMIN_PASSWORD") {
            self.bootstrap.admin_password = Some(v);
        }
        if let Some(v) = lookup("CARE_ADMIN_NAME") {
            self.bootstrap.admin_name = v;
        }
        if let Some(v) = lookup("CARE_PASSWORD_MEMORY_KIB") {
            self.passwords.memory_kib = parse_number("CARE_PASSWORD_MEMORY_KIB", &v)?;
        }
        if let Some(v) = lookup("CARE_PASSWORD_ITERATIONS") {
            self.passwords.iterations = parse_number("CARE_PASSWORD_ITERATIONS", &v)?;
        }
        if let Some(v) = lookup("CARE_PASSWORD_PARALLELISM") {
            self.passwords.parallelism = parse_number("CARE_PASSWORD_PARALLELISM", &v)?;
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("bootstrap admin email is not set; set CARE_ADMIN_EMAIL")]
    MissingAdminEmail,

    #[error("bootstrap admin password for {0} is not set; set CARE_ADMIN_PASSWORD")]
    MissingAdminPassword(String),

    #[error("bootstrap admin password must be at least {min_len} characters")]
    WeakAdminPassword { min_len: usize },

    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },

    #[error("password hashing parameters rejected: {0}")]
    PasswordHashing(String),
}

fn invalid(var: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    }
}

fn parse_number(var: &'static str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| invalid(var, value))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Attachment storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Prefix of the public URL handed back for stored files.
    pub file_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_base_url: "memory://case-files".to_string(),
        }
    }
}

/// Admin account provisioned at startup.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_email: None,
            admin_password: None,
            admin_name: "CareBridge Admin".to_string(),
        }
    }
}

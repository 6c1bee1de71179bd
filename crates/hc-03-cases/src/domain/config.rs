//! Case subsystem configuration.

use serde::{Deserialize, Serialize};

/// Case subsystem configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseConfig {
    /// Reject a manual move to `funded` until the funding goal is reached.
    /// Off by default, which lets hospitals mark a case funded directly.
    pub require_funding_for_funded: bool,
    /// Upper bound on a single attached file.
    pub max_file_bytes: u64,
    /// Upper bound on files per case.
    pub max_files_per_case: usize,
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            require_funding_for_funded: false,
            max_file_bytes: 10 * 1024 * 1024, // 10 MiB
            max_files_per_case: 20,
        }
    }
}

impl CaseConfig {
    /// Small limits for tests.
    pub fn for_testing() -> Self {
        Self {
            max_file_bytes: 1024,
            max_files_per_case: 3,
            ..Default::default()
        }
    }
}

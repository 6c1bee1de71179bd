//! In-memory credential store holding argon2id PHC strings.

use std::collections::HashMap;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{CareError, CareResult, UserId};

use crate::domain::normalize_email;
use crate::ports::CredentialStore;

/// argon2id cost parameters for new password hashes.
///
/// Stored hashes carry their own parameters, so changing these only affects
/// passwords set afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHashing {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashing {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl PasswordHashing {
    /// Smallest parameters argon2 accepts. Fast enough for test suites.
    pub fn for_testing() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }

    pub fn hasher(&self) -> Result<Argon2<'static>, argon2::Error> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

struct StoredCredential {
    user_id: UserId,
    phc: String,
}

#[derive(Default)]
pub struct InMemoryCredentialStore {
    hashing: PasswordHashing,
    entries: RwLock<HashMap<String, StoredCredential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hashing(hashing: PasswordHashing) -> Self {
        Self {
            hashing,
            entries: RwLock::default(),
        }
    }

    fn hasher(&self) -> CareResult<Argon2<'static>> {
        self.hashing
            .hasher()
            .map_err(|e| CareError::unavailable(format!("password hashing misconfigured: {}", e)))
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn set_password(&self, user_id: UserId, email: &str, password: &str) -> CareResult<()> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CareError::unavailable(format!("password hashing failed: {}", e)))?
            .to_string();
        self.entries
            .write()
            .insert(normalize_email(email), StoredCredential { user_id, phc });
        Ok(())
    }

    async fn verify(&self, email: &str, password: &str) -> CareResult<Option<UserId>> {
        let Some((user_id, phc)) = self
            .entries
            .read()
            .get(&normalize_email(email))
            .map(|stored| (stored.user_id, stored.phc.clone()))
        else {
            return Ok(None);
        };

        let parsed = PasswordHash::new(&phc)
            .map_err(|e| CareError::unavailable(format!("stored password hash unreadable: {}", e)))?;
        match self.hasher()?.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(Some(user_id)),
            Err(password_hash::Error::Password) => Ok(None),
            Err(e) => Err(CareError::unavailable(format!(
                "password verification failed: {}",
                e
            ))),
        }
    }
}

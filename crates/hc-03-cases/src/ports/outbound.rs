//! Outbound (Driven) ports for the Case subsystem.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{CareResult, CaseId};

use crate::domain::Case;

/// Edit applied to one case row under the store's row lock.
///
/// Returning an error discards every change the closure made.
pub type CaseMutation<'a> = Box<dyn FnOnce(&mut Case) -> CareResult<()> + Send + 'a>;

/// Row store for cases.
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// # Errors
    /// - `Conflict`: a case with the same id exists
    async fn insert(&self, case: Case) -> CareResult<()>;

    async fn get(&self, case_id: CaseId) -> CareResult<Option<Case>>;

    /// Applies `mutation` atomically and returns the committed row.
    ///
    /// # Errors
    /// - `NotFound`: no such case
    /// - whatever `mutation` returns, with the row left unchanged
    async fn update<'a>(&self, case_id: CaseId, mutation: CaseMutation<'a>) -> CareResult<Case>;

    async fn list(&self) -> CareResult<Vec<Case>>;
}

/// Location and size of a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    pub url: String,
    pub size: u64,
}

/// Opaque blob store. Contents are never interpreted.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// # Errors
    /// - `Conflict`: `path` is already taken
    /// - `Unavailable`: the store could not be reached
    async fn put(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> CareResult<StoredBlob>;
}

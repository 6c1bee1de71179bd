//! In-memory blob store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{CareError, CareResult};

use crate::ports::{FileStore, StoredBlob};

const DEFAULT_BASE_URL: &str = "memory://case-files";

struct Blob {
    content_type: String,
    bytes: Vec<u8>,
}

/// Blob store keyed by path.
pub struct InMemoryFileStore {
    base_url: String,
    blobs: RwLock<HashMap<String, Blob>>,
}

impl Default for InMemoryFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl InMemoryFileStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.blobs.read().contains_key(path)
    }

    /// Content type and bytes stored at `path`.
    pub fn read(&self, path: &str) -> Option<(String, Vec<u8>)> {
        self.blobs
            .read()
            .get(path)
            .map(|b| (b.content_type.clone(), b.bytes.clone()))
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn put(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> CareResult<StoredBlob> {
        let mut blobs = self.blobs.write();
        if blobs.contains_key(path) {
            return Err(CareError::conflict(format!("file {} already exists", path)));
        }
        let size = bytes.len() as u64;
        blobs.insert(
            path.to_string(),
            Blob {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(StoredBlob {
            url: format!("{}/{}", self.base_url, path),
            size,
        })
    }
}

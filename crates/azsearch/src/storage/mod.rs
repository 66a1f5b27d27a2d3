//! Blob storage used by the document upload flow.

pub mod rest;

use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, PoisonError};

/// Container and blob operations on one storage account.
pub trait BlobStore: Send + Sync {
    /// Whether the container exists.
    fn container_exists(&self, container: &str) -> Result<bool>;

    /// Create the container.
    fn create_container(&self, container: &str) -> Result<()>;

    /// Upload a block blob, replacing any existing blob with the same name.
    fn upload_blob(&self, container: &str, name: &str, data: &[u8]) -> Result<()>;
}

#[derive(Debug, Default)]
struct MockStoreState {
    containers: BTreeSet<String>,
    blobs: BTreeMap<(String, String), Vec<u8>>,
    uploads: usize,
    failing_blobs: BTreeSet<String>,
}

/// In-memory blob store for tests. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockBlobStore {
    state: Arc<Mutex<MockStoreState>>,
}

impl MockBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create a container.
    pub fn add_container(&self, container: &str) {
        self.lock().containers.insert(container.to_string());
    }

    /// Make uploads of `name` fail.
    pub fn fail_blob(&self, name: &str) {
        self.lock().failing_blobs.insert(name.to_string());
    }

    pub fn blob(&self, container: &str, name: &str) -> Option<Vec<u8>> {
        self.lock()
            .blobs
            .get(&(container.to_string(), name.to_string()))
            .cloned()
    }

    /// Blob names in a container, sorted.
    pub fn blob_names(&self, container: &str) -> Vec<String> {
        self.lock()
            .blobs
            .keys()
            .filter(|(c, _)| c == container)
            .map(|(_, n)| n.clone())
            .collect()
    }

    /// Total upload calls that succeeded, including overwrites.
    pub fn upload_count(&self) -> usize {
        self.lock().uploads
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockStoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BlobStore for MockBlobStore {
    fn container_exists(&self, container: &str) -> Result<bool> {
        Ok(self.lock().containers.contains(container))
    }

    fn create_container(&self, container: &str) -> Result<()> {
        let mut state = self.lock();
        if !state.containers.insert(container.to_string()) {
            return Err(Error::StorageRejected {
                target: container.to_string(),
                status: 409,
                message: "ContainerAlreadyExists".to_string(),
            });
        }
        Ok(())
    }

    fn upload_blob(&self, container: &str, name: &str, data: &[u8]) -> Result<()> {
        let mut state = self.lock();
        if !state.containers.contains(container) {
            return Err(Error::StorageRejected {
                target: container.to_string(),
                status: 404,
                message: "ContainerNotFound".to_string(),
            });
        }
        if state.failing_blobs.contains(name) {
            return Err(Error::StorageRejected {
                target: format!("{container}/{name}"),
                status: 500,
                message: "mock failure".to_string(),
            });
        }
        state
            .blobs
            .insert((container.to_string(), name.to_string()), data.to_vec());
        state.uploads += 1;
        Ok(())
    }
}

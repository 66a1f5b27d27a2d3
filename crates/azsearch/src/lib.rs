//! # azsearch
//!
//! Minimal blocking client for provisioning search service resources and
//! uploading source documents to blob storage.
//!
//! This crate provides:
//! - Typed index, data source, skillset and indexer definitions
//! - Idempotent create-or-update against the management REST API
//! - Bearer token acquisition from the environment or the Azure CLI
//! - Container creation and overwrite-on-upload for block blobs
//!
//! ## Example
//!
//! ```no_run
//! use azsearch::{SearchClient, SearchIndex, Definition};
//! use azsearch::credential::DefaultCredential;
//! use std::sync::Arc;
//!
//! let client = SearchClient::new(
//!     "https://my-search.search.windows.net",
//!     Arc::new(DefaultCredential::new()),
//! );
//!
//! let index = SearchIndex::from_json(r#"{"name": "docs-index", "fields": []}"#).unwrap();
//! let outcome = client.create_or_update(&index).expect("apply failed");
//! println!("{} {:?}", index.name, outcome);
//! ```

#![warn(clippy::all)]

pub mod backend;
pub mod credential;
pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use models::{
    DataContainer, DataSourceConnection, DataSourceCredentials, Definition, Indexer, SearchIndex,
    Skillset,
};
pub use types::{AccessToken, ApplyOutcome, ResourceKind};

use backend::SearchBackend;
use backend::rest::RestBackend;
use credential::TokenCredential;
use std::fmt;
use std::sync::Arc;

/// High-level client for search service resources.
///
/// Wraps a [`SearchBackend`] with typed definitions.
///
/// # Example
///
/// ```
/// use azsearch::{SearchClient, Skillset, Definition, ApplyOutcome};
/// use azsearch::backend::MockBackend;
///
/// let client = SearchClient::with_backend(Box::new(MockBackend::new()));
/// let skillset = Skillset::from_json(r#"{"name": "docs-skills", "skills": []}"#).unwrap();
///
/// assert_eq!(client.create_or_update(&skillset).unwrap(), ApplyOutcome::Created);
/// assert_eq!(client.create_or_update(&skillset).unwrap(), ApplyOutcome::Updated);
/// ```
pub struct SearchClient {
    backend: Box<dyn SearchBackend>,
}

impl fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchClient").finish_non_exhaustive()
    }
}

impl SearchClient {
    /// Create a client for a service endpoint using the REST backend.
    pub fn new(endpoint: impl Into<String>, credential: Arc<dyn TokenCredential>) -> Self {
        Self {
            backend: Box::new(RestBackend::new(endpoint, credential)),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    #[must_use]
    pub fn with_backend(backend: Box<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Create or replace a resource by name.
    pub fn create_or_update<D: Definition>(&self, definition: &D) -> Result<ApplyOutcome> {
        let body = definition.to_value()?;
        self.backend
            .create_or_update(D::KIND, definition.name(), &body)
    }

    /// Fetch and deserialize a resource, `None` if absent.
    pub fn get<D: Definition>(&self, name: &str) -> Result<Option<D>> {
        match self.backend.get(D::KIND, name)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| Error::InvalidResponse(e.to_string())),
            None => Ok(None),
        }
    }

    /// Whether a resource of `kind` named `name` exists.
    pub fn exists(&self, kind: ResourceKind, name: &str) -> Result<bool> {
        Ok(self.backend.get(kind, name)?.is_some())
    }
}

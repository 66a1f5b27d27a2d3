//! Search service backends.
//!
//! This module provides the [`SearchBackend`] trait and its implementations.
//! [`rest::RestBackend`] talks to the service's management REST API.
//!
//! # Testing
//!
//! Use [`MockBackend`] for testing without network access:
//!
//! ```
//! use azsearch::backend::{MockBackend, SearchBackend};
//! use azsearch::{ApplyOutcome, ResourceKind};
//! use serde_json::json;
//!
//! let mock = MockBackend::new();
//! let body = json!({"name": "docs-index", "fields": []});
//!
//! let first = mock.create_or_update(ResourceKind::Index, "docs-index", &body).unwrap();
//! let second = mock.create_or_update(ResourceKind::Index, "docs-index", &body).unwrap();
//! assert_eq!(first, ApplyOutcome::Created);
//! assert_eq!(second, ApplyOutcome::Updated);
//! assert_eq!(mock.resource_count(), 1);
//! ```

pub mod rest;

use crate::error::{Error, Result};
use crate::types::{ApplyOutcome, ResourceKind};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

/// Management operations on a search service.
pub trait SearchBackend: Send + Sync {
    /// Create the resource if absent or replace it if present, by name.
    ///
    /// Repeating the call with the same body must converge to the same state.
    fn create_or_update(&self, kind: ResourceKind, name: &str, body: &Value) -> Result<ApplyOutcome>;

    /// Fetch a resource definition, `None` if it does not exist.
    fn get(&self, kind: ResourceKind, name: &str) -> Result<Option<Value>>;
}

#[derive(Debug, Default)]
struct MockState {
    resources: BTreeMap<(ResourceKind, String), Value>,
    calls: Vec<(ResourceKind, String)>,
    failing: HashSet<ResourceKind>,
}

/// In-memory backend for testing without network access.
///
/// Clones share state, so a test can hand one clone to a client and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every create-or-update of `kind` fail with a 400 rejection.
    pub fn fail_on(&self, kind: ResourceKind) {
        self.lock().failing.insert(kind);
    }

    /// Stored definition for a resource.
    pub fn resource(&self, kind: ResourceKind, name: &str) -> Option<Value> {
        self.lock().resources.get(&(kind, name.to_string())).cloned()
    }

    /// Number of stored resources.
    pub fn resource_count(&self) -> usize {
        self.lock().resources.len()
    }

    /// Every create-or-update call received, in order.
    pub fn calls(&self) -> Vec<(ResourceKind, String)> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SearchBackend for MockBackend {
    fn create_or_update(&self, kind: ResourceKind, name: &str, body: &Value) -> Result<ApplyOutcome> {
        let mut state = self.lock();
        state.calls.push((kind, name.to_string()));

        if state.failing.contains(&kind) {
            return Err(Error::Rejected {
                kind,
                name: name.to_string(),
                status: 400,
                message: "mock rejection".to_string(),
            });
        }

        let previous = state
            .resources
            .insert((kind, name.to_string()), body.clone());
        Ok(match previous {
            Some(_) => ApplyOutcome::Updated,
            None => ApplyOutcome::Created,
        })
    }

    fn get(&self, kind: ResourceKind, name: &str) -> Result<Option<Value>> {
        Ok(self.resource(kind, name))
    }
}

//! Apply context and provider traits
//!
//! These traits allow the declarative crate to be used without
//! depending on a specific logging or UI implementation.

use crate::types::ApplyResult;

/// Progress callback for execution operations
///
/// One value is created per run and passed to [`crate::execute`]; it is the
/// only channel through which the executor reports what it is doing.
pub trait ProgressCallback {
    /// Called once before the first resource is applied
    fn on_plan_start(&mut self, count: usize);

    /// Called when starting to apply a single resource
    fn on_resource_start(&mut self, id: &str, description: &str);

    /// Called when a resource application completes
    fn on_resource_complete(&mut self, id: &str, result: &ApplyResult);

    /// Called when a resource fails, before the error is returned
    fn on_resource_failed(&mut self, id: &str, error: &anyhow::Error);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_plan_start(&mut self, _count: usize) {}
    fn on_resource_start(&mut self, _id: &str, _description: &str) {}
    fn on_resource_complete(&mut self, _id: &str, _result: &ApplyResult) {}
    fn on_resource_failed(&mut self, _id: &str, _error: &anyhow::Error) {}
}

/// Context passed to resource apply operations
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyContext {
    /// Whether this is a dry run (no remote changes)
    pub dry_run: bool,
    /// Whether to output verbose information
    pub verbose: bool,
}

impl ApplyContext {
    /// Create a new apply context
    pub fn new(dry_run: bool, verbose: bool) -> Self {
        Self { dry_run, verbose }
    }
}

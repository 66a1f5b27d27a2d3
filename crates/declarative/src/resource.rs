//! Resource trait for declarative state management
//!
//! A Resource represents something on a remote system that can be
//! brought to a desired definition by an idempotent apply.

use crate::context::ApplyContext;
use crate::types::ApplyResult;
use anyhow::Result;
use std::fmt;

/// Core trait for declarative resources
///
/// Every resource in the system implements this trait, which provides:
/// - Identity (id, description, type)
/// - Dependencies on other resources in the same plan
/// - State convergence (apply)
///
/// # Example
///
/// ```ignore
/// use declarative::{Resource, ApplyResult, ApplyContext};
///
/// #[derive(Debug)]
/// struct View {
///     name: String,
///     table: String,
/// }
///
/// impl Resource for View {
///     fn id(&self) -> String {
///         format!("view:{}", self.name)
///     }
///
///     fn description(&self) -> String {
///         format!("Create or update view {}", self.name)
///     }
///
///     fn resource_type(&self) -> &'static str {
///         "view"
///     }
///
///     fn depends_on(&self) -> Vec<String> {
///         vec![format!("table:{}", self.table)]
///     }
///
///     fn apply(&self, ctx: &mut ApplyContext) -> Result<ApplyResult> {
///         if ctx.dry_run {
///             return Ok(ApplyResult::Skipped { reason: "Dry run".into() });
///         }
///         Ok(ApplyResult::Created)
///     }
/// }
/// ```
pub trait Resource: Send + Sync + fmt::Debug {
    /// Unique identifier for this resource
    ///
    /// This should be stable and unique within a plan. Examples:
    /// - "index:docs-index"
    /// - "indexer:docs-indexer"
    fn id(&self) -> String;

    /// Human-readable description of what this resource does
    fn description(&self) -> String;

    /// Resource type category
    ///
    /// Used for grouping and display. Examples:
    /// - "index", "datasource", "skillset", "indexer"
    fn resource_type(&self) -> &'static str;

    /// Ids of resources that must be applied before this one
    fn depends_on(&self) -> Vec<String> {
        Vec::new()
    }

    /// Apply the desired definition
    ///
    /// This method should:
    /// 1. Build the desired definition
    /// 2. Respect ctx.dry_run (return Skipped if true)
    /// 3. Create or replace the resource
    /// 4. Return the appropriate ApplyResult
    ///
    /// Applying the same definition twice must converge to the same state.
    fn apply(&self, ctx: &mut ApplyContext) -> Result<ApplyResult>;
}

/// A boxed resource for type-erased storage
pub type BoxedResource = Box<dyn Resource>;

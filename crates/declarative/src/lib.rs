//! # Declarative
//!
//! A framework for declarative, ordered resource application.
//!
//! This crate provides the core abstractions for declaring a set of
//! dependent resources and converging a remote system to match them with
//! idempotent create-or-update steps.
//!
//! ## Core Concepts
//!
//! - **Resource**: Something that can be applied idempotently (an index, a data source, ...)
//! - **ExecutionPlan**: An ordered list of resources whose dependencies precede them
//! - **Executor**: Applies resources sequentially and stops at the first failure
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{
//!     Resource, ApplyResult, ApplyContext, ExecutionPlan, ExecuteOptions, execute,
//!     NoProgress,
//! };
//!
//! #[derive(Debug)]
//! struct Table { name: String }
//!
//! impl Resource for Table {
//!     fn id(&self) -> String { format!("table:{}", self.name) }
//!     fn description(&self) -> String { format!("Table {}", self.name) }
//!     fn resource_type(&self) -> &'static str { "table" }
//!
//!     fn apply(&self, ctx: &mut ApplyContext) -> anyhow::Result<ApplyResult> {
//!         if ctx.dry_run {
//!             return Ok(ApplyResult::Skipped { reason: "Dry run".into() });
//!         }
//!         Ok(ApplyResult::Created)
//!     }
//! }
//!
//! let mut plan = ExecutionPlan::new();
//! plan.push(Box::new(Table { name: "users".into() }));
//!
//! let summary = execute(&plan, &ExecuteOptions::default(), &mut NoProgress)?;
//! ```
//!
//! ## Provider Traits
//!
//! Reporting is injected rather than global:
//!
//! - [`ProgressCallback`]: Receives start/complete/failure events for one run
//!
//! This keeps the crate free of any logging or UI framework.

pub mod context;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use context::{ApplyContext, NoProgress, ProgressCallback};
pub use executor::execute;
pub use planner::{ExecutionPlan, PlanError};
pub use resource::{BoxedResource, Resource};
pub use types::{ApplyResult, ExecuteOptions, ExecuteSummary};

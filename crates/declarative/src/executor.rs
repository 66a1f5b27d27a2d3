//! Execution engine - applies resources in plan order, stopping at the first failure

use crate::context::{ApplyContext, ProgressCallback};
use crate::planner::ExecutionPlan;
use crate::types::{ExecuteOptions, ExecuteSummary};
use anyhow::{Context, Result};

/// Execute a plan with the given options and progress callback
///
/// The plan is validated before anything is applied. Resources are applied
/// one at a time in plan order; the first failure is reported to `progress`
/// and returned with the failing resource id as context. Resources applied
/// before the failure are left as they are.
pub fn execute<P>(
    plan: &ExecutionPlan,
    opts: &ExecuteOptions,
    progress: &mut P,
) -> Result<ExecuteSummary>
where
    P: ProgressCallback + ?Sized,
{
    plan.validate().context("Invalid execution plan")?;

    let mut summary = ExecuteSummary::default();
    if plan.is_empty() {
        return Ok(summary);
    }

    progress.on_plan_start(plan.len());

    for resource in plan.resources() {
        let id = resource.id();
        progress.on_resource_start(&id, &resource.description());

        let mut ctx = ApplyContext::new(opts.dry_run, opts.verbose);
        match resource.apply(&mut ctx) {
            Ok(result) => {
                progress.on_resource_complete(&id, &result);
                summary.add_result(&id, &result);
            }
            Err(e) => {
                progress.on_resource_failed(&id, &e);
                return Err(e.context(format!("failed to apply {id}")));
            }
        }
    }

    Ok(summary)
}

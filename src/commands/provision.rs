use anyhow::Result;
use declarative::{ExecuteOptions, ExecuteSummary};

use super::{orchestrator, provision_params};
use crate::Context;
use crate::cli::ProvisionArgs;
use crate::engine::RunReporter;
use crate::naming::ResourceNames;
use crate::ui;

pub fn run(ctx: &Context, args: &ProvisionArgs) -> Result<()> {
    let base = &args.service.base_index_name;
    let orch = orchestrator(&args.service, &args.source);
    let params = provision_params(&args.source);

    if !ctx.quiet {
        ui::header(&format!(
            "Provisioning '{base}' on {}",
            args.service.aisearch_name
        ));
        let names = ResourceNames::from_base(base);
        ui::kv("Index", &names.index);
        ui::kv("Data source", &names.data_source);
        ui::kv("Skillset", &names.skillset);
        ui::kv("Indexer", &names.indexer);
        println!();
    }

    let opts = ExecuteOptions {
        dry_run: args.dry_run,
        verbose: ctx.verbose > 0,
    };
    let mut reporter = RunReporter::new(ctx.quiet);
    let summary = orch
        .provision(base, &params, &opts, &mut reporter)
        .inspect_err(|_| {
            if let (Some(id), false) = (reporter.failed(), ctx.quiet) {
                ui::dim(&format!(
                    "Stopped at step {} ({id}); resources applied before it keep their new definitions",
                    reporter.started()
                ));
            }
        })?;

    if !ctx.quiet {
        println!();
        if args.dry_run {
            ui::info(&summary_line(&summary, true));
        } else {
            ui::success(&summary_line(&summary, false));
        }
        for id in &summary.applied {
            ui::dim(id);
        }
    } else {
        log::info!("{}", summary_line(&summary, args.dry_run));
    }

    Ok(())
}

fn summary_line(summary: &ExecuteSummary, dry_run: bool) -> String {
    if dry_run {
        return format!(
            "Dry run - {} validated, no changes made",
            ui::plural(summary.total(), "definition", "definitions")
        );
    }
    format!(
        "Applied {}: {} created, {} updated",
        ui::plural(summary.total(), "resource", "resources"),
        summary.created,
        summary.updated
    )
}

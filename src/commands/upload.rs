use anyhow::{Result, bail};
use azsearch::storage::BlobStore;
use azsearch::storage::rest::RestBlobStore;
use colored::Colorize;

use super::credential;
use crate::Context;
use crate::cli::UploadArgs;
use crate::config;
use crate::ui;
use crate::upload::{UploadOptions, UploadReport, upload_all};

pub fn run(ctx: &Context, args: &UploadArgs) -> Result<()> {
    let store = RestBlobStore::new(config::blob_endpoint(&args.storage_name), credential());
    run_with(ctx, args, &store)
}

fn run_with(ctx: &Context, args: &UploadArgs, store: &dyn BlobStore) -> Result<()> {
    let opts = UploadOptions {
        container: args.container_name.clone(),
        source_dir: args.source_dir.clone(),
        extension: args.extension.clone(),
        jobs: args.jobs,
        quiet: ctx.quiet,
    };

    if !ctx.quiet {
        ui::header(&format!(
            "Uploading *.{} from {} to {}/{}",
            opts.extension.trim_start_matches('.'),
            opts.source_dir.display(),
            args.storage_name,
            opts.container
        ));
    }

    let report = upload_all(store, &opts)?;
    print_report(ctx, &opts, &report);

    if !report.is_success() {
        bail!(
            "{} of {} failed to upload",
            report.failed.len(),
            ui::plural(report.failed.len() + report.uploaded.len(), "file", "files")
        );
    }
    Ok(())
}

fn print_report(ctx: &Context, opts: &UploadOptions, report: &UploadReport) {
    if report.created_container {
        log::info!("Created container {}", opts.container);
    }
    if ctx.quiet {
        return;
    }

    if report.created_container {
        ui::info(&format!("Created container {}", opts.container));
    }

    if report.uploaded.is_empty() && report.failed.is_empty() {
        ui::warn(&format!(
            "No .{} files found",
            opts.extension.trim_start_matches('.')
        ));
        return;
    }

    if report.is_success() {
        ui::success(&format!(
            "Uploaded {}",
            ui::plural(report.uploaded.len(), "file", "files")
        ));
    } else {
        ui::warn(&format!(
            "Uploaded {}, {} failed",
            report.uploaded.len(),
            report.failed.len()
        ));
        println!();
        ui::error("Failed files:");
        for (file, error) in &report.failed {
            println!("  {} {} - {}", "✗".red(), file.display(), error.dimmed());
        }
    }
}

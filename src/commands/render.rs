use anyhow::{Context as _, Result};

use super::{orchestrator, provision_params};
use crate::cli::RenderArgs;

/// Print the four definitions in apply order, tagged with kind and name.
pub fn run(args: &RenderArgs) -> Result<()> {
    let orch = orchestrator(&args.service, &args.source);
    let rendered = orch.render(&args.service.base_index_name, &provision_params(&args.source))?;

    let output =
        serde_json::to_string_pretty(&rendered).context("Failed to format rendered definitions")?;
    println!("{output}");
    Ok(())
}

use anyhow::{Context as _, Result};
use azsearch::{ResourceKind, SearchClient};
use colored::Colorize;

use super::search_client;
use crate::Context;
use crate::cli::StatusArgs;
use crate::naming::ResourceNames;
use crate::ui;

/// Remote presence of one derived resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceStatus {
    pub kind: ResourceKind,
    pub name: String,
    pub exists: bool,
}

pub fn run(ctx: &Context, args: &StatusArgs) -> Result<()> {
    let client = search_client(&args.service);
    let statuses = check(&client, &args.service.base_index_name)?;

    if !ctx.quiet {
        ui::header(&format!(
            "Resources for '{}' on {}",
            args.service.base_index_name, args.service.aisearch_name
        ));
    }
    for status in &statuses {
        let mark = if status.exists {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "  {mark} {:<10} {}",
            status.kind.to_string(),
            if status.exists {
                status.name.normal()
            } else {
                status.name.dimmed()
            }
        );
    }

    let missing = statuses.iter().filter(|s| !s.exists).count();
    if !ctx.quiet {
        println!();
        if missing == 0 {
            ui::success("All resources exist");
        } else {
            ui::warn(&format!(
                "{} missing",
                ui::plural(missing, "resource", "resources")
            ));
        }
    }
    Ok(())
}

/// Look up the four resources derived from `base`, in apply order.
pub fn check(client: &SearchClient, base: &str) -> Result<Vec<ResourceStatus>> {
    let names = ResourceNames::from_base(base);
    let pairs = [
        (ResourceKind::Index, names.index),
        (ResourceKind::DataSource, names.data_source),
        (ResourceKind::Skillset, names.skillset),
        (ResourceKind::Indexer, names.indexer),
    ];

    pairs
        .into_iter()
        .map(|(kind, name)| {
            let exists = client
                .exists(kind, &name)
                .with_context(|| format!("Failed to look up {kind} {name}"))?;
            Ok(ResourceStatus { kind, name, exists })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use azsearch::backend::{MockBackend, SearchBackend};
    use serde_json::json;

    #[test]
    fn test_check_reports_each_resource() {
        let mock = MockBackend::new();
        mock.create_or_update(ResourceKind::Index, "docs-index", &json!({}))
            .unwrap();
        mock.create_or_update(ResourceKind::Skillset, "docs-skills", &json!({}))
            .unwrap();
        let client = SearchClient::with_backend(Box::new(mock));

        let statuses = check(&client, "docs").unwrap();
        let present: Vec<_> = statuses.iter().map(|s| (s.name.as_str(), s.exists)).collect();
        assert_eq!(
            present,
            vec![
                ("docs-index", true),
                ("docs-ds", false),
                ("docs-skills", true),
                ("docs-indexer", false),
            ]
        );
    }
}

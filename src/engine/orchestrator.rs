//! Orchestrator - derives names, builds the plan and runs it

use anyhow::{Context, Result};
use azsearch::{Definition, ResourceKind, SearchClient};
use declarative::{ExecuteOptions, ExecuteSummary, ExecutionPlan, ProgressCallback, execute};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::TemplateSet;
use crate::naming::ResourceNames;
use crate::resource::{
    DataSourceResource, IndexerResource, SearchIndexResource, SkillsetResource, StorageSource,
};

/// Caller-supplied values shared by every provisioning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionParams {
    /// Base URI of the embedding service
    pub openai_uri: String,
    pub storage: StorageSource,
}

/// A rendered and validated definition, ready to send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDefinition {
    pub kind: ResourceKind,
    pub name: String,
    #[serde(rename = "definition")]
    pub body: Value,
}

/// The four resources of one base name
struct Resources {
    index: SearchIndexResource,
    data_source: DataSourceResource,
    skillset: SkillsetResource,
    indexer: IndexerResource,
}

/// Provisions an index, data source, skillset and indexer from one base name
pub struct Orchestrator {
    client: Arc<SearchClient>,
    templates: TemplateSet,
}

impl Orchestrator {
    pub fn new(client: Arc<SearchClient>, templates: TemplateSet) -> Self {
        Self { client, templates }
    }

    fn resources(&self, base: &str, params: &ProvisionParams) -> Result<Resources> {
        let names = ResourceNames::from_base(base);
        let templates = self.templates.load()?;
        log::debug!("Resource names for '{base}': {names:?}");

        Ok(Resources {
            index: SearchIndexResource::new(
                &names.index,
                &params.openai_uri,
                templates.index,
                Arc::clone(&self.client),
            ),
            data_source: DataSourceResource::new(
                &names.data_source,
                params.storage.clone(),
                templates.data_source,
                Arc::clone(&self.client),
            ),
            skillset: SkillsetResource::new(
                &names.skillset,
                &names.index,
                &params.openai_uri,
                templates.skillset,
                Arc::clone(&self.client),
            ),
            indexer: IndexerResource::new(
                &names.indexer,
                &names.index,
                &names.skillset,
                &names.data_source,
                templates.indexer,
                Arc::clone(&self.client),
            ),
        })
    }

    /// Plan in the fixed order Index, DataSource, Skillset, Indexer.
    pub fn plan(&self, base: &str, params: &ProvisionParams) -> Result<ExecutionPlan> {
        let resources = self.resources(base, params)?;

        let mut plan = ExecutionPlan::new();
        plan.push(Box::new(resources.index));
        plan.push(Box::new(resources.data_source));
        plan.push(Box::new(resources.skillset));
        plan.push(Box::new(resources.indexer));
        Ok(plan)
    }

    /// Apply all four resources, stopping at the first failure.
    ///
    /// Resources applied before a failure keep their new definitions.
    pub fn provision<P>(
        &self,
        base: &str,
        params: &ProvisionParams,
        opts: &ExecuteOptions,
        progress: &mut P,
    ) -> Result<ExecuteSummary>
    where
        P: ProgressCallback + ?Sized,
    {
        let plan = self.plan(base, params)?;
        log::info!(
            "Provisioning {} resources for '{base}'{}",
            plan.len(),
            if opts.dry_run { " (dry run)" } else { "" }
        );
        execute(&plan, opts, progress)
    }

    /// Render and validate every definition without touching the service.
    pub fn render(&self, base: &str, params: &ProvisionParams) -> Result<Vec<RenderedDefinition>> {
        let resources = self.resources(base, params)?;

        Ok(vec![
            rendered(&resources.index.definition()?)?,
            rendered(&resources.data_source.definition()?)?,
            rendered(&resources.skillset.definition()?)?,
            rendered(&resources.indexer.definition()?)?,
        ])
    }
}

fn rendered<D: Definition>(definition: &D) -> Result<RenderedDefinition> {
    let body = definition
        .to_value()
        .with_context(|| format!("Failed to serialize {} '{}'", D::KIND, definition.name()))?;
    Ok(RenderedDefinition {
        kind: D::KIND,
        name: definition.name().to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use azsearch::backend::MockBackend;
    use declarative::NoProgress;
    use std::fs;

    fn params() -> ProvisionParams {
        ProvisionParams {
            openai_uri: "https://oai.example.com".to_string(),
            storage: StorageSource {
                subscription_id: "s1".to_string(),
                resource_group: "rg1".to_string(),
                storage_account: "acct1".to_string(),
                container: "raw".to_string(),
            },
        }
    }

    fn orchestrator(mock: &MockBackend) -> Orchestrator {
        Orchestrator::new(
            Arc::new(SearchClient::with_backend(Box::new(mock.clone()))),
            TemplateSet::resolve(None),
        )
    }

    fn stored(mock: &MockBackend) -> Vec<Option<Value>> {
        [
            (ResourceKind::Index, "docs-index"),
            (ResourceKind::DataSource, "docs-ds"),
            (ResourceKind::Skillset, "docs-skills"),
            (ResourceKind::Indexer, "docs-indexer"),
        ]
        .into_iter()
        .map(|(kind, name)| mock.resource(kind, name))
        .collect()
    }

    #[test]
    fn test_plan_order_and_ids() {
        let plan = orchestrator(&MockBackend::new())
            .plan("docs", &params())
            .unwrap();

        assert_eq!(
            plan.ids(),
            vec![
                "index:docs-index",
                "datasource:docs-ds",
                "skillset:docs-skills",
                "indexer:docs-indexer",
            ]
        );
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_provision_is_idempotent() {
        let mock = MockBackend::new();
        let orch = orchestrator(&mock);
        let opts = ExecuteOptions::default();

        let first = orch.provision("docs", &params(), &opts, &mut NoProgress).unwrap();
        assert_eq!(first.created, 4);
        let after_first = stored(&mock);

        let second = orch.provision("docs", &params(), &opts, &mut NoProgress).unwrap();
        assert_eq!(second.updated, 4);
        assert_eq!(second.created, 0);

        assert_eq!(stored(&mock), after_first);
        assert!(after_first.iter().all(Option::is_some));
        assert_eq!(mock.resource_count(), 4);
    }

    #[test]
    fn test_provision_applies_in_order() {
        let mock = MockBackend::new();
        orchestrator(&mock)
            .provision("docs", &params(), &ExecuteOptions::default(), &mut NoProgress)
            .unwrap();

        let kinds: Vec<_> = mock.calls().into_iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, ResourceKind::all().to_vec());
    }

    #[test]
    fn test_skillset_failure_stops_before_indexer() {
        let mock = MockBackend::new();
        mock.fail_on(ResourceKind::Skillset);

        let err = orchestrator(&mock)
            .provision("docs", &params(), &ExecuteOptions::default(), &mut NoProgress)
            .unwrap_err();

        assert!(format!("{err:#}").contains("skillset:docs-skills"));
        assert!(
            !mock
                .calls()
                .iter()
                .any(|(kind, _)| *kind == ResourceKind::Indexer)
        );
        // Earlier steps stay applied.
        assert!(mock.resource(ResourceKind::Index, "docs-index").is_some());
        assert!(mock.resource(ResourceKind::DataSource, "docs-ds").is_some());
    }

    #[test]
    fn test_dry_run_makes_no_calls() {
        let mock = MockBackend::new();
        let opts = ExecuteOptions {
            dry_run: true,
            ..Default::default()
        };

        let summary = orchestrator(&mock)
            .provision("docs", &params(), &opts, &mut NoProgress)
            .unwrap();

        assert_eq!(summary.skipped, 4);
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_render_matches_provisioned_bodies() {
        let mock = MockBackend::new();
        let orch = orchestrator(&mock);

        let rendered = orch.render("docs", &params()).unwrap();
        orch.provision("docs", &params(), &ExecuteOptions::default(), &mut NoProgress)
            .unwrap();

        assert_eq!(rendered.len(), 4);
        for def in &rendered {
            assert_eq!(mock.resource(def.kind, &def.name).as_ref(), Some(&def.body));
            assert!(!def.body.to_string().contains("<"));
        }
        assert_eq!(
            rendered[1].body["credentials"]["connectionString"],
            "ResourceId=/subscriptions/s1/resourceGroups/rg1/providers/Microsoft.Storage/storageAccounts/acct1;"
        );
    }

    #[test]
    fn test_rendered_output_shape() {
        let rendered = orchestrator(&MockBackend::new())
            .render("docs", &params())
            .unwrap();
        let value = serde_json::to_value(&rendered).unwrap();

        assert_eq!(value[0]["kind"], "index");
        assert_eq!(value[1]["kind"], "datasource");
        assert_eq!(value[3]["name"], "docs-indexer");
        assert_eq!(value[3]["definition"]["skillsetName"], "docs-skills");
    }

    #[test]
    fn test_missing_template_fails_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.json"), "{}").unwrap();

        let mock = MockBackend::new();
        let orch = Orchestrator::new(
            Arc::new(SearchClient::with_backend(Box::new(mock.clone()))),
            TemplateSet::resolve(Some(dir.path())),
        );

        let err = orch
            .provision("docs", &params(), &ExecuteOptions::default(), &mut NoProgress)
            .unwrap_err();
        assert!(format!("{err:#}").contains("data source template"));
        assert!(mock.calls().is_empty());
    }
}

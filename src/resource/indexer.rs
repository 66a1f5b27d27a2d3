//! Indexer resource

use anyhow::Result;
use azsearch::{Indexer, ResourceKind, SearchClient};
use declarative::{ApplyContext, ApplyResult, Resource};
use std::sync::Arc;

use super::{
    DATA_SOURCE_NAME, SEARCH_INDEX_NAME, SEARCH_INDEXER_NAME, SKILLSET_NAME, apply_definition,
    render_definition, resource_id,
};
use crate::template::{Template, Tokens};

/// The indexer; binds and runs against the index, data source and skillset,
/// which must all exist remotely before it is applied
#[derive(Debug)]
pub struct IndexerResource {
    pub name: String,
    pub index_name: String,
    pub skillset_name: String,
    pub data_source_name: String,
    template: Template,
    client: Arc<SearchClient>,
}

impl IndexerResource {
    pub fn new(
        name: &str,
        index_name: &str,
        skillset_name: &str,
        data_source_name: &str,
        template: Template,
        client: Arc<SearchClient>,
    ) -> Self {
        Self {
            name: name.to_string(),
            index_name: index_name.to_string(),
            skillset_name: skillset_name.to_string(),
            data_source_name: data_source_name.to_string(),
            template,
            client,
        }
    }

    pub fn tokens(&self) -> Tokens {
        Tokens::new()
            .with(SEARCH_INDEXER_NAME, &self.name)
            .with(SEARCH_INDEX_NAME, &self.index_name)
            .with(SKILLSET_NAME, &self.skillset_name)
            .with(DATA_SOURCE_NAME, &self.data_source_name)
    }

    pub fn definition(&self) -> Result<Indexer> {
        render_definition(&self.template, &self.tokens(), &self.name)
    }
}

impl Resource for IndexerResource {
    fn id(&self) -> String {
        resource_id(ResourceKind::Indexer, &self.name)
    }

    fn description(&self) -> String {
        format!(
            "Create or update indexer {} (data source {}, skillset {}, index {})",
            self.name, self.data_source_name, self.skillset_name, self.index_name
        )
    }

    fn resource_type(&self) -> &'static str {
        "indexer"
    }

    fn depends_on(&self) -> Vec<String> {
        vec![
            resource_id(ResourceKind::Index, &self.index_name),
            resource_id(ResourceKind::DataSource, &self.data_source_name),
            resource_id(ResourceKind::Skillset, &self.skillset_name),
        ]
    }

    fn apply(&self, ctx: &mut ApplyContext) -> Result<ApplyResult> {
        let definition = self.definition()?;
        apply_definition(&self.client, &definition, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplateSet;
    use azsearch::backend::MockBackend;

    fn resource(template: Template) -> IndexerResource {
        IndexerResource::new(
            "docs-indexer",
            "docs-index",
            "docs-skills",
            "docs-ds",
            template,
            Arc::new(SearchClient::with_backend(Box::new(MockBackend::new()))),
        )
    }

    #[test]
    fn test_definition_binds_all_three() {
        let templates = TemplateSet::resolve(None).load().unwrap();
        let indexer = resource(templates.indexer).definition().unwrap();

        assert_eq!(indexer.name, "docs-indexer");
        assert_eq!(indexer.target_index_name, "docs-index");
        assert_eq!(indexer.data_source_name, "docs-ds");
        assert_eq!(indexer.skillset_name.as_deref(), Some("docs-skills"));
    }

    #[test]
    fn test_unfilled_token_fails_before_any_call() {
        // open_ai_uri is a known token, but not one the indexer supplies.
        let template = Template::from_text(
            "indexer.json",
            r#"{"name": "<search_indexer_name>", "dataSourceName": "<data_source_name>",
                "targetIndexName": "<search_index_name>", "description": "<open_ai_uri>"}"#,
        );
        let err = resource(template).definition().unwrap_err();
        assert!(format!("{err:#}").contains("<open_ai_uri>"));
    }

    #[test]
    fn test_description_is_plain_ascii() {
        let description = resource(Template::from_text("indexer.json", "{}")).description();
        assert_eq!(
            description,
            "Create or update indexer docs-indexer (data source docs-ds, skillset docs-skills, index docs-index)"
        );
        assert!(description.is_ascii());
    }
}

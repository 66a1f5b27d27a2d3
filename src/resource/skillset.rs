//! Skillset resource

use anyhow::Result;
use azsearch::{ResourceKind, SearchClient, Skillset};
use declarative::{ApplyContext, ApplyResult, Resource};
use std::sync::Arc;

use super::{
    OPEN_AI_URI, SEARCH_INDEX_NAME, SKILLSET_NAME, apply_definition, render_definition,
    resource_id,
};
use crate::template::{Template, Tokens};

/// The enrichment skillset; projects into the index, so it follows it
#[derive(Debug)]
pub struct SkillsetResource {
    pub name: String,
    pub index_name: String,
    pub openai_uri: String,
    template: Template,
    client: Arc<SearchClient>,
}

impl SkillsetResource {
    pub fn new(
        name: &str,
        index_name: &str,
        openai_uri: &str,
        template: Template,
        client: Arc<SearchClient>,
    ) -> Self {
        Self {
            name: name.to_string(),
            index_name: index_name.to_string(),
            openai_uri: openai_uri.to_string(),
            template,
            client,
        }
    }

    pub fn tokens(&self) -> Tokens {
        Tokens::new()
            .with(SKILLSET_NAME, &self.name)
            .with(SEARCH_INDEX_NAME, &self.index_name)
            .with(OPEN_AI_URI, &self.openai_uri)
    }

    pub fn definition(&self) -> Result<Skillset> {
        render_definition(&self.template, &self.tokens(), &self.name)
    }
}

impl Resource for SkillsetResource {
    fn id(&self) -> String {
        resource_id(ResourceKind::Skillset, &self.name)
    }

    fn description(&self) -> String {
        format!(
            "Create or update skillset {} projecting into {}",
            self.name, self.index_name
        )
    }

    fn resource_type(&self) -> &'static str {
        "skillset"
    }

    fn depends_on(&self) -> Vec<String> {
        vec![resource_id(ResourceKind::Index, &self.index_name)]
    }

    fn apply(&self, ctx: &mut ApplyContext) -> Result<ApplyResult> {
        let definition = self.definition()?;
        apply_definition(&self.client, &definition, ctx)
    }
}

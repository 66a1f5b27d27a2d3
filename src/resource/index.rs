//! Search index resource

use anyhow::Result;
use azsearch::{ResourceKind, SearchClient, SearchIndex};
use declarative::{ApplyContext, ApplyResult, Resource};
use std::sync::Arc;

use super::{OPEN_AI_URI, SEARCH_INDEX_NAME, apply_definition, render_definition, resource_id};
use crate::template::{Template, Tokens};

/// The search index; depends on nothing
#[derive(Debug)]
pub struct SearchIndexResource {
    pub name: String,
    /// Base URI of the embedding service used by the index vectorizer
    pub openai_uri: String,
    template: Template,
    client: Arc<SearchClient>,
}

impl SearchIndexResource {
    pub fn new(
        name: &str,
        openai_uri: &str,
        template: Template,
        client: Arc<SearchClient>,
    ) -> Self {
        Self {
            name: name.to_string(),
            openai_uri: openai_uri.to_string(),
            template,
            client,
        }
    }

    pub fn tokens(&self) -> Tokens {
        Tokens::new()
            .with(SEARCH_INDEX_NAME, &self.name)
            .with(OPEN_AI_URI, &self.openai_uri)
    }

    pub fn definition(&self) -> Result<SearchIndex> {
        render_definition(&self.template, &self.tokens(), &self.name)
    }
}

impl Resource for SearchIndexResource {
    fn id(&self) -> String {
        resource_id(ResourceKind::Index, &self.name)
    }

    fn description(&self) -> String {
        format!("Create or update index {}", self.name)
    }

    fn resource_type(&self) -> &'static str {
        "index"
    }

    fn apply(&self, ctx: &mut ApplyContext) -> Result<ApplyResult> {
        let definition = self.definition()?;
        apply_definition(&self.client, &definition, ctx)
    }
}

//! Search service resources
//!
//! Each resource kind renders its template with its own tokens, deserializes
//! the result into the typed definition and applies it with
//! create-or-update. A resource only ever touches the remote object it is
//! named after.

pub mod data_source;
pub mod index;
pub mod indexer;
pub mod skillset;

pub use data_source::{DataSourceResource, StorageSource};
pub use index::SearchIndexResource;
pub use indexer::IndexerResource;
pub use skillset::SkillsetResource;

use anyhow::{Context, Result, bail};
use azsearch::{ApplyOutcome, Definition, ResourceKind, SearchClient};
use declarative::{ApplyContext, ApplyResult};

use crate::template::{Template, Tokens};

// Placeholder names used by the shipped templates.
pub const SEARCH_INDEX_NAME: &str = "search_index_name";
pub const SEARCH_INDEXER_NAME: &str = "search_indexer_name";
pub const DATA_SOURCE_NAME: &str = "data_source_name";
pub const SKILLSET_NAME: &str = "skillset_name";
pub const OPEN_AI_URI: &str = "open_ai_uri";
pub const CONNECTION_STRING: &str = "connection_string";
pub const CONTAINER_NAME: &str = "container_name";

/// Every token the provisioner fills. Templates must not leave any of these
/// unresolved; other `<word>` text is kept as written.
pub const TOKEN_NAMES: &[&str] = &[
    SEARCH_INDEX_NAME,
    SEARCH_INDEXER_NAME,
    DATA_SOURCE_NAME,
    SKILLSET_NAME,
    OPEN_AI_URI,
    CONNECTION_STRING,
    CONTAINER_NAME,
];

/// Plan id for a resource, e.g. "skillset:docs-skills"
pub fn resource_id(kind: ResourceKind, name: &str) -> String {
    format!("{kind}:{name}")
}

/// Render a template and deserialize it into a definition named `expected_name`.
pub(crate) fn render_definition<D: Definition>(
    template: &Template,
    tokens: &Tokens,
    expected_name: &str,
) -> Result<D> {
    log::trace!("{} placeholders: {:?}", template.name(), template.placeholders());
    let text = template
        .render(tokens, TOKEN_NAMES)
        .with_context(|| format!("Failed to render {} template", D::KIND))?;

    let definition = D::from_json(&text)
        .with_context(|| format!("Rendered template {} is not valid", template.name()))?;

    if definition.name() != expected_name {
        bail!(
            "Rendered {} is named '{}' but '{}' was expected (check the name placeholder in {})",
            D::KIND,
            definition.name(),
            expected_name,
            template.name()
        );
    }

    Ok(definition)
}

/// Create or replace a definition unless this is a dry run.
pub(crate) fn apply_definition<D: Definition>(
    client: &SearchClient,
    definition: &D,
    ctx: &ApplyContext,
) -> Result<ApplyResult> {
    if ctx.dry_run {
        return Ok(ApplyResult::Skipped {
            reason: "Dry run".to_string(),
        });
    }

    let outcome = client.create_or_update(definition)?;
    log::debug!("{} '{}': {outcome:?}", D::KIND, definition.name());

    Ok(match outcome {
        ApplyOutcome::Created => ApplyResult::Created,
        ApplyOutcome::Updated => ApplyResult::Updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use azsearch::Skillset;

    #[test]
    fn test_resource_id() {
        assert_eq!(
            resource_id(ResourceKind::DataSource, "docs-ds"),
            "datasource:docs-ds"
        );
    }

    #[test]
    fn test_render_definition_checks_name() {
        let template = Template::from_text("skillset.json", r#"{"name": "<skillset_name>", "skills": []}"#);
        let tokens = Tokens::new().with(SKILLSET_NAME, "other-skills");

        let err = render_definition::<Skillset>(&template, &tokens, "docs-skills").unwrap_err();
        assert!(format!("{err:#}").contains("'docs-skills' was expected"));
    }

    #[test]
    fn test_render_definition_requires_known_tokens() {
        let template = Template::from_text(
            "skillset.json",
            r#"{"name": "<skillset_name>", "description": "<open_ai_uri>", "skills": []}"#,
        );
        let tokens = Tokens::new().with(SKILLSET_NAME, "docs-skills");

        let err = render_definition::<Skillset>(&template, &tokens, "docs-skills").unwrap_err();
        assert!(format!("{err:#}").contains("<open_ai_uri>"));
    }

    #[test]
    fn test_render_definition_keeps_markup_text() {
        let template = Template::from_text(
            "skillset.json",
            r#"{"name": "<skillset_name>", "description": "split on <br>", "skills": []}"#,
        );
        let tokens = Tokens::new().with(SKILLSET_NAME, "docs-skills");

        let skillset = render_definition::<Skillset>(&template, &tokens, "docs-skills").unwrap();
        assert_eq!(skillset.name(), "docs-skills");
    }

    #[test]
    fn test_render_definition_schema_failure() {
        let template = Template::from_text("skillset.json", r#"{"name": "<skillset_name>"}"#);
        let tokens = Tokens::new().with(SKILLSET_NAME, "docs-skills");

        let err = render_definition::<Skillset>(&template, &tokens, "docs-skills").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("skillset.json"));
        assert!(message.contains("skills"));
    }

    #[test]
    fn test_apply_definition_dry_run_makes_no_call() {
        let mock = azsearch::backend::MockBackend::new();
        let client = SearchClient::with_backend(Box::new(mock.clone()));
        let skillset = Skillset::from_json(r#"{"name": "s", "skills": []}"#).unwrap();

        let result = apply_definition(&client, &skillset, &ApplyContext::new(true, false)).unwrap();
        assert!(matches!(result, ApplyResult::Skipped { .. }));
        assert!(mock.calls().is_empty());
    }
}

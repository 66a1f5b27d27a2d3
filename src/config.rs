//! Service endpoints and template locations.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::template::Template;

pub const INDEX_TEMPLATE: &str = "index.json";
pub const DATASOURCE_TEMPLATE: &str = "datasource.json";
pub const SKILLSET_TEMPLATE: &str = "skillset.json";
pub const INDEXER_TEMPLATE: &str = "indexer.json";

/// Management endpoint for a search service name.
pub fn search_endpoint(service_name: &str) -> String {
    format!("https://{service_name}.search.windows.net")
}

/// Blob endpoint for a storage account.
pub fn blob_endpoint(storage_account: &str) -> String {
    format!("https://{storage_account}.blob.core.windows.net")
}

/// Paths of the four resource templates in an override directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePaths {
    pub index: PathBuf,
    pub data_source: PathBuf,
    pub skillset: PathBuf,
    pub indexer: PathBuf,
}

impl TemplatePaths {
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            index: dir.join(INDEX_TEMPLATE),
            data_source: dir.join(DATASOURCE_TEMPLATE),
            skillset: dir.join(SKILLSET_TEMPLATE),
            indexer: dir.join(INDEXER_TEMPLATE),
        }
    }
}

/// Where the four resource templates come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSet {
    /// Templates compiled into the binary.
    Shipped,
    /// Templates read from disk at run time.
    Files(TemplatePaths),
}

impl TemplateSet {
    pub fn from_dir(dir: &Path) -> Self {
        Self::Files(TemplatePaths::from_dir(dir))
    }

    /// Use `dir` if given, the shipped templates otherwise.
    pub fn resolve(dir: Option<&Path>) -> Self {
        dir.map_or(Self::Shipped, Self::from_dir)
    }

    /// Read all four templates.
    pub fn load(&self) -> Result<LoadedTemplates> {
        match self {
            Self::Shipped => Ok(LoadedTemplates::shipped()),
            Self::Files(paths) => Ok(LoadedTemplates {
                index: Template::load(&paths.index).context("Failed to load index template")?,
                data_source: Template::load(&paths.data_source)
                    .context("Failed to load data source template")?,
                skillset: Template::load(&paths.skillset)
                    .context("Failed to load skillset template")?,
                indexer: Template::load(&paths.indexer)
                    .context("Failed to load indexer template")?,
            }),
        }
    }
}

/// The four templates, read once per run.
#[derive(Debug, Clone)]
pub struct LoadedTemplates {
    pub index: Template,
    pub data_source: Template,
    pub skillset: Template,
    pub indexer: Template,
}

impl LoadedTemplates {
    fn shipped() -> Self {
        Self {
            index: Template::from_text(
                shipped_name(INDEX_TEMPLATE),
                include_str!("../templates/index.json"),
            ),
            data_source: Template::from_text(
                shipped_name(DATASOURCE_TEMPLATE),
                include_str!("../templates/datasource.json"),
            ),
            skillset: Template::from_text(
                shipped_name(SKILLSET_TEMPLATE),
                include_str!("../templates/skillset.json"),
            ),
            indexer: Template::from_text(
                shipped_name(INDEXER_TEMPLATE),
                include_str!("../templates/indexer.json"),
            ),
        }
    }
}

fn shipped_name(file: &str) -> String {
    format!("{file} (built in)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(search_endpoint("svc"), "https://svc.search.windows.net");
        assert_eq!(blob_endpoint("acct1"), "https://acct1.blob.core.windows.net");
    }

    #[test]
    fn test_template_set_from_dir() {
        let paths = TemplatePaths::from_dir(Path::new("/tmp/t"));
        assert_eq!(paths.index, PathBuf::from("/tmp/t/index.json"));
        assert_eq!(paths.indexer, PathBuf::from("/tmp/t/indexer.json"));
        assert_eq!(
            TemplateSet::resolve(Some(Path::new("/tmp/t"))),
            TemplateSet::Files(paths)
        );
    }

    #[test]
    fn test_resolve_without_dir_uses_built_in_templates() {
        assert_eq!(TemplateSet::resolve(None), TemplateSet::Shipped);
    }

    #[test]
    fn test_shipped_templates_are_built_in() {
        let loaded = TemplateSet::Shipped.load().unwrap();
        assert_eq!(loaded.index.name(), "index.json (built in)");
        assert_eq!(loaded.indexer.name(), "indexer.json (built in)");
        assert!(loaded.skillset.placeholders().contains("open_ai_uri"));
    }

    #[test]
    fn test_shipped_templates_load() {
        let loaded = TemplateSet::resolve(None).load().unwrap();
        assert!(loaded.index.placeholders().contains("search_index_name"));
        assert!(loaded.data_source.placeholders().contains("connection_string"));
        assert!(loaded.skillset.placeholders().contains("skillset_name"));
        assert!(loaded.indexer.placeholders().contains("data_source_name"));
    }

    #[test]
    fn test_missing_dir_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let err = TemplateSet::from_dir(dir.path()).load().unwrap_err();
        assert!(format!("{err:#}").contains("index template"));
    }
}

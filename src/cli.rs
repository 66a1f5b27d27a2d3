use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::validate::{absolute_url, storage_account_name, valid_name};

#[derive(Parser)]
#[command(name = "searchprov")]
#[command(version)]
#[command(
    about = "Provision search indexes, data sources, skillsets and indexers from templates",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create or update the index, data source, skillset and indexer
    ///
    /// If AZURE_ACCESS_TOKEN is set it is used as-is, so it must be a token
    /// for https://search.azure.com. Otherwise the Azure CLI issues one.
    Provision(ProvisionArgs),

    /// Print the rendered definitions without contacting the service
    Render(RenderArgs),

    /// Show which of the derived resources exist on the service
    ///
    /// If AZURE_ACCESS_TOKEN is set it is used as-is, so it must be a token
    /// for https://search.azure.com. Otherwise the Azure CLI issues one.
    Status(StatusArgs),

    /// Upload local documents to a blob container
    ///
    /// If AZURE_ACCESS_TOKEN is set it is used as-is, so it must be a token
    /// for https://storage.azure.com, not the search token used by provision.
    /// Otherwise the Azure CLI issues one.
    Upload(UploadArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Shared arguments
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Search service name
    #[arg(long, alias = "aisearch_name", env = "AISEARCH_NAME", value_parser = valid_name)]
    pub aisearch_name: String,

    /// Base name the four resource names are derived from
    #[arg(long, alias = "base_index_name", env = "BASE_INDEX_NAME", value_parser = valid_name)]
    pub base_index_name: String,
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Base URI of the embedding service
    #[arg(long, alias = "openai_api_base", env = "OPENAI_API_BASE", value_parser = absolute_url)]
    pub openai_api_base: String,

    /// Subscription holding the storage account
    #[arg(long, alias = "subscription_id", env = "AZURE_SUBSCRIPTION_ID", value_parser = valid_name)]
    pub subscription_id: String,

    /// Resource group holding the storage account
    #[arg(
        long,
        alias = "resource_group_name",
        env = "AZURE_RESOURCE_GROUP",
        value_parser = valid_name
    )]
    pub resource_group_name: String,

    /// Storage account the data source reads from
    #[arg(long, alias = "storage_name", env = "STORAGE_NAME", value_parser = valid_name)]
    pub storage_name: String,

    /// Container holding the source documents
    #[arg(long, alias = "container_name", env = "STORAGE_CONTAINER", value_parser = valid_name)]
    pub container_name: String,

    /// Directory with index.json, datasource.json, skillset.json and indexer.json
    /// [default: templates built into the binary]
    #[arg(long, env = "SEARCHPROV_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct ProvisionArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Render and validate every definition without applying it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[command(flatten)]
    pub service: ServiceArgs,
}

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// Storage account name (lowercase letters and digits)
    #[arg(long, alias = "storage_name", env = "STORAGE_NAME", value_parser = storage_account_name)]
    pub storage_name: String,

    /// Container to upload into; created if absent
    #[arg(long, alias = "container_name", env = "STORAGE_CONTAINER", value_parser = valid_name)]
    pub container_name: String,

    /// Directory scanned recursively for documents
    #[arg(long, default_value = "data")]
    pub source_dir: PathBuf,

    /// Extension of the files to upload
    #[arg(long, default_value = "pdf")]
    pub extension: String,

    /// Number of parallel uploads
    #[arg(short, long, default_value = "4")]
    pub jobs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    fn provision_argv() -> Vec<&'static str> {
        vec![
            "searchprov",
            "provision",
            "--aisearch-name",
            "my-search",
            "--base_index_name",
            "docs",
            "--openai-api-base",
            "https://oai.example.com",
            "--subscription-id",
            "s1",
            "--resource-group-name",
            "rg1",
            "--storage_name",
            "acct1",
            "--container-name",
            "raw",
        ]
    }

    #[test]
    fn test_provision_accepts_both_spellings() {
        let cli = Cli::try_parse_from(provision_argv()).unwrap();
        match cli.command {
            Command::Provision(args) => {
                assert_eq!(args.service.base_index_name, "docs");
                assert_eq!(args.source.storage_name, "acct1");
                assert!(!args.dry_run);
                assert!(args.source.templates_dir.is_none());
            }
            _ => panic!("Expected provision"),
        }
    }

    #[test]
    fn test_provision_rejects_bad_values() {
        let mut argv = provision_argv();
        argv[5] = "bad name!";
        assert!(Cli::try_parse_from(&argv).is_err());

        let mut argv = provision_argv();
        argv[7] = "not-a-url";
        assert!(Cli::try_parse_from(&argv).is_err());
    }

    #[test]
    fn test_upload_defaults() {
        let cli = Cli::try_parse_from([
            "searchprov",
            "upload",
            "--storage-name",
            "acct1",
            "--container-name",
            "raw",
        ])
        .unwrap();
        match cli.command {
            Command::Upload(args) => {
                assert_eq!(args.source_dir, PathBuf::from("data"));
                assert_eq!(args.extension, "pdf");
                assert_eq!(args.jobs, 4);
            }
            _ => panic!("Expected upload"),
        }
    }

    #[test]
    fn test_token_audience_in_long_help() {
        let cmd = Cli::command();
        let long_about = |name: &str| {
            cmd.find_subcommand(name)
                .and_then(|sub| sub.get_long_about())
                .map(ToString::to_string)
                .unwrap_or_default()
        };

        assert!(long_about("upload").contains("https://storage.azure.com"));
        assert!(long_about("provision").contains("https://search.azure.com"));
        assert!(long_about("status").contains("https://search.azure.com"));
    }

    #[test]
    fn test_upload_rejects_uppercase_storage_name() {
        let result = Cli::try_parse_from([
            "searchprov",
            "upload",
            "--storage-name",
            "Acct1",
            "--container-name",
            "raw",
        ]);
        assert!(result.is_err());
    }
}

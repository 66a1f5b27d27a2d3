// Provisioning
pub mod provision;
pub mod render;
pub mod status;

// Document upload
pub mod upload;

use azsearch::SearchClient;
use azsearch::credential::{DefaultCredential, TokenCredential};
use std::sync::Arc;

use crate::cli::{ServiceArgs, SourceArgs};
use crate::config::{self, TemplateSet};
use crate::engine::{Orchestrator, ProvisionParams};
use crate::resource::StorageSource;

/// Token source for every remote call of one invocation.
fn credential() -> Arc<dyn TokenCredential> {
    Arc::new(DefaultCredential::new())
}

fn search_client(service: &ServiceArgs) -> Arc<SearchClient> {
    let endpoint = config::search_endpoint(&service.aisearch_name);
    log::debug!("Search endpoint: {endpoint}");
    Arc::new(SearchClient::new(endpoint, credential()))
}

fn provision_params(source: &SourceArgs) -> ProvisionParams {
    ProvisionParams {
        openai_uri: source.openai_api_base.clone(),
        storage: StorageSource {
            subscription_id: source.subscription_id.clone(),
            resource_group: source.resource_group_name.clone(),
            storage_account: source.storage_name.clone(),
            container: source.container_name.clone(),
        },
    }
}

fn orchestrator(service: &ServiceArgs, source: &SourceArgs) -> Orchestrator {
    let templates = TemplateSet::resolve(source.templates_dir.as_deref());
    log::debug!("Templates: {templates:?}");
    Orchestrator::new(search_client(service), templates)
}

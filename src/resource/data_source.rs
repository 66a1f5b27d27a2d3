//! Blob data source resource

use anyhow::Result;
use azsearch::{DataSourceConnection, ResourceKind, SearchClient};
use declarative::{ApplyContext, ApplyResult, Resource};
use std::sync::Arc;

use super::{
    CONNECTION_STRING, CONTAINER_NAME, DATA_SOURCE_NAME, apply_definition, render_definition,
    resource_id,
};
use crate::connection::storage_connection_string;
use crate::template::{Template, Tokens};

/// Storage account and container a data source reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSource {
    pub subscription_id: String,
    pub resource_group: String,
    pub storage_account: String,
    pub container: String,
}

impl StorageSource {
    pub fn connection_string(&self) -> String {
        storage_connection_string(
            &self.subscription_id,
            &self.resource_group,
            &self.storage_account,
        )
    }
}

/// The blob data source; depends on nothing
#[derive(Debug)]
pub struct DataSourceResource {
    pub name: String,
    pub source: StorageSource,
    template: Template,
    client: Arc<SearchClient>,
}

impl DataSourceResource {
    pub fn new(
        name: &str,
        source: StorageSource,
        template: Template,
        client: Arc<SearchClient>,
    ) -> Self {
        Self {
            name: name.to_string(),
            source,
            template,
            client,
        }
    }

    pub fn tokens(&self) -> Tokens {
        Tokens::new()
            .with(DATA_SOURCE_NAME, &self.name)
            .with(CONNECTION_STRING, self.source.connection_string())
            .with(CONTAINER_NAME, &self.source.container)
    }

    /// Rendered definition with the identity connection string set explicitly.
    ///
    /// The service only binds the managed identity when `connectionString`
    /// is present, whatever the template put there.
    pub fn definition(&self) -> Result<DataSourceConnection> {
        let mut definition: DataSourceConnection =
            render_definition(&self.template, &self.tokens(), &self.name)?;
        definition.credentials.connection_string = Some(self.source.connection_string());
        Ok(definition)
    }
}

impl Resource for DataSourceResource {
    fn id(&self) -> String {
        resource_id(ResourceKind::DataSource, &self.name)
    }

    fn description(&self) -> String {
        format!(
            "Create or update data source {} for container {}",
            self.name, self.source.container
        )
    }

    fn resource_type(&self) -> &'static str {
        "datasource"
    }

    fn apply(&self, ctx: &mut ApplyContext) -> Result<ApplyResult> {
        let definition = self.definition()?;
        apply_definition(&self.client, &definition, ctx)
    }
}

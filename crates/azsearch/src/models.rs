//! Typed resource definitions.
//!
//! Each definition names the fields the provisioning flow reads or writes
//! and keeps every other property in `extra`, so a document rendered from a
//! template reaches the service unchanged.

use crate::error::{Error, Result};
use crate::types::ResourceKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A resource document that can be sent to the search service.
pub trait Definition: Serialize + DeserializeOwned {
    /// Kind of resource this definition describes.
    const KIND: ResourceKind;

    /// Resource name, used as the identity for create-or-update.
    fn name(&self) -> &str;

    /// Deserialize a definition from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDefinition` if the text does not match the schema.
    fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidDefinition {
            kind: Self::KIND,
            message: e.to_string(),
        })
    }

    /// Serialize to a JSON value for the request body.
    fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| Error::InvalidDefinition {
            kind: Self::KIND,
            message: e.to_string(),
        })
    }
}

/// Search index definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndex {
    pub name: String,
    pub fields: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Definition for SearchIndex {
    const KIND: ResourceKind = ResourceKind::Index;

    fn name(&self) -> &str {
        &self.name
    }
}

/// Credentials block of a data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceCredentials {
    #[serde(default)]
    pub connection_string: Option<String>,
}

/// Container a data source reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataContainer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Data source connection definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceConnection {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub credentials: DataSourceCredentials,
    pub container: DataContainer,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Definition for DataSourceConnection {
    const KIND: ResourceKind = ResourceKind::DataSource;

    fn name(&self) -> &str {
        &self.name
    }
}

/// Skillset definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skillset {
    pub name: String,
    pub skills: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Definition for Skillset {
    const KIND: ResourceKind = ResourceKind::Skillset;

    fn name(&self) -> &str {
        &self.name
    }
}

/// Indexer definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indexer {
    pub name: String,
    pub data_source_name: String,
    pub target_index_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skillset_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Definition for Indexer {
    const KIND: ResourceKind = ResourceKind::Indexer;

    fn name(&self) -> &str {
        &self.name
    }
}

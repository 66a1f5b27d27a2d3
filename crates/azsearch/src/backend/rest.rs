//! REST backend for the search service management API.

use crate::backend::SearchBackend;
use crate::credential::{SEARCH_SCOPE, TokenCredential};
use crate::error::{Error, Result};
use crate::types::{ApplyOutcome, ResourceKind};
use serde_json::Value;
use std::sync::Arc;

/// Management API version the templates are written against.
pub const API_VERSION: &str = "2024-07-01";

/// Search service REST backend.
///
/// # Example
///
/// ```no_run
/// use azsearch::backend::rest::RestBackend;
/// use azsearch::backend::SearchBackend;
/// use azsearch::credential::DefaultCredential;
/// use azsearch::ResourceKind;
/// use std::sync::Arc;
///
/// let backend = RestBackend::new(
///     "https://my-search.search.windows.net",
///     Arc::new(DefaultCredential::new()),
/// );
/// let index = backend.get(ResourceKind::Index, "docs-index").unwrap();
/// println!("exists: {}", index.is_some());
/// ```
pub struct RestBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Service endpoint, e.g. `https://name.search.windows.net`.
    endpoint: String,
    api_version: String,
    credential: Arc<dyn TokenCredential>,
}

impl RestBackend {
    /// Create a backend for a service endpoint.
    pub fn new(endpoint: impl Into<String>, credential: Arc<dyn TokenCredential>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_version: API_VERSION.to_string(),
            credential,
        }
    }

    /// Override the API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Get the service endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the URL for a named resource.
    fn resource_url(&self, kind: ResourceKind, name: &str) -> String {
        format!(
            "{}/{}/{}?api-version={}",
            self.endpoint,
            kind.collection(),
            name,
            self.api_version
        )
    }

    fn bearer(&self) -> Result<String> {
        let token = self.credential.get_token(SEARCH_SCOPE)?;
        Ok(format!("Bearer {}", token.token))
    }
}

/// Pull the service's error message out of a response body.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

impl SearchBackend for RestBackend {
    fn create_or_update(&self, kind: ResourceKind, name: &str, body: &Value) -> Result<ApplyOutcome> {
        let url = self.resource_url(kind, name);
        log::debug!("PUT {url}");

        let mut response = self
            .agent
            .put(&url)
            .header("Authorization", self.bearer()?)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("Prefer", "return=representation")
            .send_json(body)?;

        let status = response.status().as_u16();
        if let Some(outcome) = ApplyOutcome::from_status(status) {
            return Ok(outcome);
        }

        let text = response.body_mut().read_to_string().unwrap_or_default();
        Err(Error::Rejected {
            kind,
            name: name.to_string(),
            status,
            message: error_message(&text),
        })
    }

    fn get(&self, kind: ResourceKind, name: &str) -> Result<Option<Value>> {
        let url = self.resource_url(kind, name);
        log::debug!("GET {url}");

        let mut response = self
            .agent
            .get(&url)
            .header("Authorization", self.bearer()?)
            .header("Accept", "application/json")
            .call()?;

        match response.status().as_u16() {
            200 => {
                let value: Value = response
                    .body_mut()
                    .read_json()
                    .map_err(|e| Error::InvalidResponse(e.to_string()))?;
                Ok(Some(value))
            }
            404 => Ok(None),
            status => {
                let text = response.body_mut().read_to_string().unwrap_or_default();
                Err(Error::Rejected {
                    kind,
                    name: name.to_string(),
                    status,
                    message: error_message(&text),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::StaticTokenCredential;

    fn backend() -> RestBackend {
        RestBackend::new(
            "https://svc.search.windows.net/",
            Arc::new(StaticTokenCredential::new("t")),
        )
    }

    #[test]
    fn test_resource_url() {
        let backend = backend();
        assert_eq!(backend.endpoint(), "https://svc.search.windows.net");
        assert_eq!(
            backend.resource_url(ResourceKind::DataSource, "docs-ds"),
            "https://svc.search.windows.net/datasources/docs-ds?api-version=2024-07-01"
        );
        assert_eq!(
            backend
                .with_api_version("2025-05-01")
                .resource_url(ResourceKind::Indexer, "docs-indexer"),
            "https://svc.search.windows.net/indexers/docs-indexer?api-version=2025-05-01"
        );
    }

    #[test]
    fn test_bearer_header() {
        assert_eq!(backend().bearer().unwrap(), "Bearer t");
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"error": {"code": "InvalidRequestParameter", "message": "field 'x' is invalid"}}"#;
        assert_eq!(error_message(body), "field 'x' is invalid");
        assert_eq!(error_message("plain failure\n"), "plain failure");
    }
}

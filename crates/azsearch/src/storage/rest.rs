//! REST implementation of [`BlobStore`].

use crate::backend::rest::error_message;
use crate::credential::{STORAGE_SCOPE, TokenCredential};
use crate::error::{Error, Result};
use crate::storage::BlobStore;
use std::sync::Arc;

/// Storage service version sent with every request.
pub const STORAGE_API_VERSION: &str = "2023-11-03";

/// Blob service client for one storage account.
pub struct RestBlobStore {
    agent: ureq::Agent,
    /// Account endpoint, e.g. `https://acct.blob.core.windows.net`.
    account_url: String,
    credential: Arc<dyn TokenCredential>,
}

impl RestBlobStore {
    pub fn new(account_url: impl Into<String>, credential: Arc<dyn TokenCredential>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            account_url: account_url.into().trim_end_matches('/').to_string(),
            credential,
        }
    }

    fn container_url(&self, container: &str) -> String {
        format!("{}/{}?restype=container", self.account_url, container)
    }

    /// Blob URL with the container and blob name percent-encoded as path segments.
    fn blob_url(&self, container: &str, name: &str) -> Result<String> {
        let mut url = url::Url::parse(&self.account_url)
            .map_err(|e| Error::Other(format!("invalid account URL {}: {e}", self.account_url)))?;
        url.path_segments_mut()
            .map_err(|()| Error::Other(format!("account URL cannot be a base: {}", self.account_url)))?
            .pop_if_empty()
            .push(container)
            .push(name);
        Ok(url.into())
    }

    fn bearer(&self) -> Result<String> {
        let token = self.credential.get_token(STORAGE_SCOPE)?;
        Ok(format!("Bearer {}", token.token))
    }

    fn rejected(target: String, status: u16, response: &mut ureq::http::Response<ureq::Body>) -> Error {
        let text = response.body_mut().read_to_string().unwrap_or_default();
        Error::StorageRejected {
            target,
            status,
            message: error_message(&text),
        }
    }
}

impl BlobStore for RestBlobStore {
    fn container_exists(&self, container: &str) -> Result<bool> {
        let mut response = self
            .agent
            .get(&self.container_url(container))
            .header("Authorization", self.bearer()?)
            .header("x-ms-version", STORAGE_API_VERSION)
            .call()?;

        match response.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(Self::rejected(container.to_string(), status, &mut response)),
        }
    }

    fn create_container(&self, container: &str) -> Result<()> {
        let mut response = self
            .agent
            .put(&self.container_url(container))
            .header("Authorization", self.bearer()?)
            .header("x-ms-version", STORAGE_API_VERSION)
            .send_empty()?;

        match response.status().as_u16() {
            201 => Ok(()),
            status => Err(Self::rejected(container.to_string(), status, &mut response)),
        }
    }

    fn upload_blob(&self, container: &str, name: &str, data: &[u8]) -> Result<()> {
        let mut response = self
            .agent
            .put(&self.blob_url(container, name)?)
            .header("Authorization", self.bearer()?)
            .header("x-ms-version", STORAGE_API_VERSION)
            .header("x-ms-blob-type", "BlockBlob")
            .header("Content-Type", "application/octet-stream")
            .send(data)?;

        match response.status().as_u16() {
            201 => Ok(()),
            status => Err(Self::rejected(
                format!("{container}/{name}"),
                status,
                &mut response,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::StaticTokenCredential;

    #[test]
    fn test_urls() {
        let store = RestBlobStore::new(
            "https://acct.blob.core.windows.net/",
            Arc::new(StaticTokenCredential::new("t")),
        );
        assert_eq!(
            store.container_url("raw"),
            "https://acct.blob.core.windows.net/raw?restype=container"
        );
        assert_eq!(
            store.blob_url("raw", "a_b.pdf").unwrap(),
            "https://acct.blob.core.windows.net/raw/a_b.pdf"
        );
        assert_eq!(
            store.blob_url("raw", "q3 report.pdf").unwrap(),
            "https://acct.blob.core.windows.net/raw/q3%20report.pdf"
        );
        assert_eq!(store.bearer().unwrap(), "Bearer t");
    }
}

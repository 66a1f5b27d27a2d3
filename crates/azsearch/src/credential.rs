//! Access token providers.
//!
//! [`DefaultCredential`] tries, in order, a token from the environment and
//! the Azure CLI. Tokens are cached per scope while their reported expiry is
//! more than [`REFRESH_MARGIN_MINUTES`] away. Tokens without a known expiry
//! are fetched again on every request.

use crate::error::{Error, Result};
use crate::types::AccessToken;
use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::process::Command;
use std::sync::{Mutex, PoisonError};

/// Token scope for search service management calls.
pub const SEARCH_SCOPE: &str = "https://search.azure.com/.default";

/// Token scope for blob storage calls.
pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";

/// Environment variable holding a pre-issued bearer token.
pub const TOKEN_ENV_VAR: &str = "AZURE_ACCESS_TOKEN";

/// A cached token is refreshed this long before it expires.
pub const REFRESH_MARGIN_MINUTES: i64 = 5;

/// Source of bearer tokens.
pub trait TokenCredential: Send + Sync {
    /// Get a token valid for `scope`.
    fn get_token(&self, scope: &str) -> Result<AccessToken>;
}

/// Always returns the same token (tests, or tokens issued out of band).
#[derive(Debug, Clone)]
pub struct StaticTokenCredential {
    token: AccessToken,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token),
        }
    }
}

impl TokenCredential for StaticTokenCredential {
    fn get_token(&self, _scope: &str) -> Result<AccessToken> {
        Ok(self.token.clone())
    }
}

/// Reads a token from [`TOKEN_ENV_VAR`].
///
/// The variable holds a single token, so it is returned for every scope. It
/// must have been issued for the audience of the calls being made:
/// `https://search.azure.com` for provisioning and status checks,
/// `https://storage.azure.com` for uploads. A token for the wrong audience is
/// rejected by the service with 401/403. Run the commands separately with a
/// matching token, or unset the variable and let the Azure CLI issue one per
/// scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentCredential;

impl TokenCredential for EnvironmentCredential {
    fn get_token(&self, _scope: &str) -> Result<AccessToken> {
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.trim().is_empty() => Ok(AccessToken::new(token.trim())),
            _ => Err(Error::Credential(format!("{TOKEN_ENV_VAR} is not set"))),
        }
    }
}

/// Obtains tokens from the signed-in Azure CLI.
#[derive(Debug, Clone)]
pub struct AzureCliCredential {
    program: String,
}

#[derive(Debug, Deserialize)]
struct CliToken {
    #[serde(rename = "accessToken")]
    access_token: String,
    /// Seconds since the epoch (newer CLI versions).
    #[serde(default)]
    expires_on: Option<i64>,
    /// Local time without offset, e.g. `2026-10-19 12:00:00.000000`.
    #[serde(default, rename = "expiresOn")]
    expires_on_local: Option<String>,
}

impl CliToken {
    fn expiry(&self) -> Option<DateTime<Utc>> {
        if let Some(secs) = self.expires_on {
            return DateTime::from_timestamp(secs, 0);
        }
        let text = self.expires_on_local.as_deref()?;
        let naive = NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M:%S%.f").ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}

impl AzureCliCredential {
    pub fn new() -> Self {
        Self {
            program: "az".to_string(),
        }
    }

    /// Use a different executable (tests, or a wrapped CLI).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn parse(stdout: &[u8]) -> Result<AccessToken> {
        let parsed: CliToken = serde_json::from_slice(stdout)
            .map_err(|e| Error::Credential(format!("unexpected az output: {e}")))?;
        let expires_on = parsed.expiry();
        if expires_on.is_none() {
            log::debug!("az returned a token without a readable expiry");
        }
        Ok(AccessToken {
            token: parsed.access_token,
            expires_on,
        })
    }
}

impl Default for AzureCliCredential {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCredential for AzureCliCredential {
    fn get_token(&self, scope: &str) -> Result<AccessToken> {
        let output = Command::new(&self.program)
            .args(["account", "get-access-token", "--scope", scope, "--output", "json"])
            .output()
            .map_err(|e| Error::Credential(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Credential(format!(
                "{} account get-access-token failed: {}",
                self.program,
                stderr.trim()
            )));
        }

        Self::parse(&output.stdout)
    }
}

/// Chain of credentials tried in order, with a per-scope cache.
pub struct DefaultCredential {
    sources: Vec<Box<dyn TokenCredential>>,
    cache: Mutex<HashMap<String, AccessToken>>,
}

impl DefaultCredential {
    /// Environment token first, then the Azure CLI.
    pub fn new() -> Self {
        Self::with_sources(vec![
            Box::new(EnvironmentCredential),
            Box::new(AzureCliCredential::new()),
        ])
    }

    pub fn with_sources(sources: Vec<Box<dyn TokenCredential>>) -> Self {
        Self {
            sources,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, scope: &str) -> Option<AccessToken> {
        let margin = TimeDelta::minutes(REFRESH_MARGIN_MINUTES);
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .get(scope)
            .filter(|token| token.is_fresh_at(Utc::now(), margin))
            .cloned()
    }

    fn store(&self, scope: &str, token: &AccessToken) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.insert(scope.to_string(), token.clone());
    }
}

impl Default for DefaultCredential {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCredential for DefaultCredential {
    fn get_token(&self, scope: &str) -> Result<AccessToken> {
        if let Some(token) = self.cached(scope) {
            return Ok(token);
        }

        let mut failures = Vec::new();
        for source in &self.sources {
            match source.get_token(scope) {
                Ok(token) => {
                    self.store(scope, &token);
                    return Ok(token);
                }
                Err(e) => {
                    log::debug!("credential source failed for {scope}: {e}");
                    failures.push(e.to_string());
                }
            }
        }

        Err(Error::Credential(format!(
            "no credential source succeeded ({})",
            failures.join("; ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing;

    impl TokenCredential for Failing {
        fn get_token(&self, _scope: &str) -> Result<AccessToken> {
            Err(Error::Credential("nope".to_string()))
        }
    }

    /// Counts calls and issues tokens with a fixed lifetime.
    struct Counting {
        calls: Arc<AtomicUsize>,
        expires_on: Option<DateTime<Utc>>,
    }

    impl Counting {
        fn expiring_in_an_hour(calls: &Arc<AtomicUsize>) -> Self {
            Self {
                calls: Arc::clone(calls),
                expires_on: Some(Utc::now() + TimeDelta::hours(1)),
            }
        }
    }

    impl TokenCredential for Counting {
        fn get_token(&self, scope: &str) -> Result<AccessToken> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let token = AccessToken::new(format!("token-for-{scope}"));
            Ok(match self.expires_on {
                Some(expiry) => token.with_expiry(expiry),
                None => token,
            })
        }
    }

    #[test]
    fn test_static_credential() {
        let cred = StaticTokenCredential::new("abc");
        assert_eq!(cred.get_token(SEARCH_SCOPE).unwrap().token, "abc");
    }

    #[test]
    fn test_default_chain_falls_through_and_caches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cred = DefaultCredential::with_sources(vec![
            Box::new(Failing),
            Box::new(Counting::expiring_in_an_hour(&calls)),
        ]);

        let first = cred.get_token(SEARCH_SCOPE).unwrap();
        let second = cred.get_token(SEARCH_SCOPE).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.token, format!("token-for-{SEARCH_SCOPE}"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cred.get_token(STORAGE_SCOPE).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_expired_token_is_fetched_again() {
        let calls = Arc::new(AtomicUsize::new(0));
        let expired = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).single();
        let cred = DefaultCredential::with_sources(vec![Box::new(Counting {
            calls: Arc::clone(&calls),
            expires_on: expired,
        })]);

        cred.get_token(SEARCH_SCOPE).unwrap();
        cred.get_token(SEARCH_SCOPE).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_token_near_expiry_is_fetched_again() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cred = DefaultCredential::with_sources(vec![Box::new(Counting {
            calls: Arc::clone(&calls),
            expires_on: Some(Utc::now() + TimeDelta::minutes(1)),
        })]);

        cred.get_token(STORAGE_SCOPE).unwrap();
        cred.get_token(STORAGE_SCOPE).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_token_without_expiry_is_not_reused() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cred = DefaultCredential::with_sources(vec![Box::new(Counting {
            calls: Arc::clone(&calls),
            expires_on: None,
        })]);

        cred.get_token(SEARCH_SCOPE).unwrap();
        cred.get_token(SEARCH_SCOPE).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_default_chain_all_fail() {
        let cred = DefaultCredential::with_sources(vec![Box::new(Failing), Box::new(Failing)]);
        let err = cred.get_token(SEARCH_SCOPE).unwrap_err();
        assert!(matches!(err, Error::Credential(_)));
    }

    #[test]
    fn test_cli_output_parse() {
        let stdout = br#"{"accessToken": "eyJ0", "expiresOn": "2026-10-19 12:00:00.000000", "tokenType": "Bearer"}"#;
        let token = AzureCliCredential::parse(stdout).unwrap();
        assert_eq!(token.token, "eyJ0");
        assert!(token.expires_on.is_some());
    }

    #[test]
    fn test_cli_output_parse_prefers_epoch_expiry() {
        let stdout = br#"{"accessToken": "eyJ0", "expiresOn": "2026-10-19 12:00:00.000000", "expires_on": 1792411200}"#;
        let token = AzureCliCredential::parse(stdout).unwrap();
        assert_eq!(token.expires_on, DateTime::from_timestamp(1_792_411_200, 0));
    }

    #[test]
    fn test_cli_output_parse_unreadable_expiry() {
        let stdout = br#"{"accessToken": "eyJ0", "expiresOn": "soon"}"#;
        let token = AzureCliCredential::parse(stdout).unwrap();
        assert_eq!(token.expires_on, None);
    }

    #[test]
    fn test_cli_missing_program() {
        let cred = AzureCliCredential::with_program("definitely-not-an-installed-az-binary");
        assert!(matches!(
            cred.get_token(SEARCH_SCOPE),
            Err(Error::Credential(_))
        ));
    }
}

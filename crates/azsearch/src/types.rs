//! Core types shared by the search and storage clients.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of resources managed on a search service.
///
/// # Example
///
/// ```
/// use azsearch::ResourceKind;
///
/// assert_eq!(ResourceKind::Skillset.collection(), "skillsets");
/// assert_eq!(ResourceKind::DataSource.to_string(), "datasource");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Schema describing searchable document fields.
    Index,
    /// Reference to the raw content container to be indexed.
    DataSource,
    /// Enrichment pipeline referenced by an indexer.
    Skillset,
    /// Pull-enrich-populate pipeline binding the other three.
    Indexer,
}

impl ResourceKind {
    /// Lowercase identifier used in ids and messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::DataSource => "datasource",
            Self::Skillset => "skillset",
            Self::Indexer => "indexer",
        }
    }

    /// REST collection segment for this kind.
    #[must_use]
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Index => "indexes",
            Self::DataSource => "datasources",
            Self::Skillset => "skillsets",
            Self::Indexer => "indexers",
        }
    }

    /// All kinds, in the order they are applied.
    #[must_use]
    pub fn all() -> &'static [ResourceKind] {
        &[Self::Index, Self::DataSource, Self::Skillset, Self::Indexer]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Outcome of a create-or-update call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The resource did not exist and was created.
    Created,
    /// The resource existed and was replaced.
    Updated,
}

impl ApplyOutcome {
    /// Map a success status code from a PUT to an outcome.
    #[must_use]
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            201 => Some(Self::Created),
            200 | 204 => Some(Self::Updated),
            _ => None,
        }
    }
}

/// A bearer token for one scope.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The raw token.
    pub token: String,
    /// Expiry as reported by the issuer, if known.
    pub expires_on: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a token without expiry information.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_on: None,
        }
    }

    pub fn with_expiry(mut self, expires_on: DateTime<Utc>) -> Self {
        self.expires_on = Some(expires_on);
        self
    }

    /// True when the token is still valid `margin` after `now`.
    /// A token without a known expiry is never considered fresh.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, margin: TimeDelta) -> bool {
        self.expires_on.is_some_and(|expiry| expiry > now + margin)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ResourceKind::Index.name(), "index");
        assert_eq!(ResourceKind::Index.collection(), "indexes");
        assert_eq!(ResourceKind::DataSource.collection(), "datasources");
        assert_eq!(ResourceKind::Indexer.to_string(), "indexer");
    }

    #[test]
    fn test_kind_all_order() {
        assert_eq!(
            ResourceKind::all(),
            &[
                ResourceKind::Index,
                ResourceKind::DataSource,
                ResourceKind::Skillset,
                ResourceKind::Indexer
            ]
        );
    }

    #[test]
    fn test_outcome_from_status() {
        assert_eq!(ApplyOutcome::from_status(201), Some(ApplyOutcome::Created));
        assert_eq!(ApplyOutcome::from_status(200), Some(ApplyOutcome::Updated));
        assert_eq!(ApplyOutcome::from_status(204), Some(ApplyOutcome::Updated));
        assert_eq!(ApplyOutcome::from_status(400), None);
    }

    #[test]
    fn test_access_token_debug_redacts() {
        let token = AccessToken::new("secret-value");
        assert!(!format!("{token:?}").contains("secret-value"));
    }

    #[test]
    fn test_token_freshness() {
        let now = Utc::now();
        let margin = TimeDelta::minutes(5);

        let long_lived = AccessToken::new("a").with_expiry(now + TimeDelta::hours(1));
        assert!(long_lived.is_fresh_at(now, margin));

        let about_to_expire = AccessToken::new("b").with_expiry(now + TimeDelta::minutes(2));
        assert!(!about_to_expire.is_fresh_at(now, margin));

        assert!(!AccessToken::new("c").is_fresh_at(now, margin));
    }
}

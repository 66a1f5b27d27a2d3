//! Error types for search service and storage operations.
//!
//! Errors are categorized so callers can decide how to report them. Nothing
//! in this crate retries; [`ErrorCategory::is_retryable`] is informational.

use crate::types::ResourceKind;
use std::fmt;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of client errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (transient).
    Network,
    /// Credential acquisition or authorization failed.
    Auth,
    /// The service refused the request.
    Rejected,
    /// A resource definition does not match the expected schema.
    InvalidDefinition,
    /// Resource or container not found.
    NotFound,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Auth => "Authentication failed",
            Self::Rejected => "Request rejected by the service",
            Self::InvalidDefinition => "Invalid resource definition",
            Self::NotFound => "Resource not found",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your network connection and the service name",
            Self::Auth => "Run `az login` or set AZURE_ACCESS_TOKEN, and check role assignments",
            Self::Rejected => "Check the rendered definition against the service API version",
            Self::InvalidDefinition => "Check the template and that every placeholder is supplied",
            Self::NotFound => "Verify the service, account and container names",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP transport failed.
    #[error("HTTP request failed: {message}")]
    HttpError {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// The service answered a resource request with a non-success status.
    #[error("{kind} '{name}' rejected with HTTP {status}: {message}")]
    Rejected {
        /// Kind of resource.
        kind: ResourceKind,
        /// Resource name.
        name: String,
        /// HTTP status code.
        status: u16,
        /// Service error message.
        message: String,
    },

    /// Storage request returned a non-success status.
    #[error("storage request for '{target}' failed with HTTP {status}: {message}")]
    StorageRejected {
        /// Container or blob addressed.
        target: String,
        /// HTTP status code.
        status: u16,
        /// Service error message.
        message: String,
    },

    /// Rendered definition did not deserialize into the resource schema.
    #[error("invalid {kind} definition: {message}")]
    InvalidDefinition {
        /// Kind of resource.
        kind: ResourceKind,
        /// Deserialization error.
        message: String,
    },

    /// Could not obtain an access token.
    #[error("credential unavailable: {0}")]
    Credential(String),

    /// Invalid response from API.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::HttpError {
            message: message.into(),
            status,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::HttpError { .. } => ErrorCategory::Network,
            Error::Rejected { status, .. } | Error::StorageRejected { status, .. } => {
                match status {
                    401 | 403 => ErrorCategory::Auth,
                    404 => ErrorCategory::NotFound,
                    500..=599 => ErrorCategory::Network,
                    _ => ErrorCategory::Rejected,
                }
            }
            Error::InvalidDefinition { .. } => ErrorCategory::InvalidDefinition,
            Error::Credential(_) => ErrorCategory::Auth,
            Error::InvalidResponse(_) => ErrorCategory::Other,
            Error::Other(_) => ErrorCategory::Other,
        }
    }

    /// Whether this error is typically transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::HttpError {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            other => Self::HttpError {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

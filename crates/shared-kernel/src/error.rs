// crates/shared-kernel/src/error.rs
use std::{fmt, path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Kind of remote entity a lookup was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Repository,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account => f.write_str("account"),
            Self::Repository => f.write_str("repository"),
        }
    }
}

/// Root error type shared across the workspace.
#[derive(Debug, Error)]
pub enum RepoLinesError {
    /// Adds human context while preserving original error as the source.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<RepoLinesError>,
    },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: EntityKind, id: String },

    #[error("Rate limit exceeded, retry after {reset_at}")]
    QuotaExceeded { reset_at: DateTime<Utc> },

    #[error("Request deadline of {after:?} exceeded")]
    Timeout { after: Duration },

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Infrastructure error: {0}")]
    Infrastructure(#[from] InfrastructureError),
}

pub type Result<T> = std::result::Result<T, RepoLinesError>;

impl RepoLinesError {
    /// Innermost error once all `Context` layers are peeled off.
    pub fn root(&self) -> &Self {
        let mut current = self;
        while let Self::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Reset time of the exhausted quota, if this failure was caused by one.
    pub fn retry_after(&self) -> Option<DateTime<Utc>> {
        match self.root() {
            Self::QuotaExceeded { reset_at } | Self::Provider(ProviderError::QuotaExceeded { reset_at }) => {
                Some(*reset_at)
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound { .. } | Self::Provider(ProviderError::NotFound { .. }))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.root(), Self::Timeout { .. })
    }
}

/// Failures reported by the remote host adapters.
///
/// `NotFound` must stay distinct from `Transient` so callers can decide
/// between skipping and aborting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    #[error("rate limit exhausted until {reset_at}")]
    QuotaExceeded { reset_at: DateTime<Utc> },

    #[error("transient failure on {resource}: {reason}")]
    Transient { resource: String, reason: String },
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

impl ProviderError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    pub fn transient(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transient { resource: resource.into(), reason: reason.into() }
    }
}

/// Domain-layer specific errors.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Invalid identifier '{value}': {reason}")]
    InvalidIdentifier { value: String, reason: String },
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;

/// Infrastructure-layer errors.
#[derive(Debug, Error)]
pub enum InfrastructureError {
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} input: {details}")]
    SerializationError { format: String, details: String },

    #[error("Thread pool creation failed: {details}")]
    ThreadPoolCreation { details: String },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

pub type InfraResult<T> = std::result::Result<T, InfrastructureError>;

impl From<std::io::Error> for InfrastructureError {
    fn from(err: std::io::Error) -> Self {
        Self::Io { message: err.to_string(), source: Some(Box::new(err)) }
    }
}

impl From<std::io::Error> for RepoLinesError {
    fn from(err: std::io::Error) -> Self {
        InfrastructureError::from(err).into()
    }
}

impl From<serde_json::Error> for InfrastructureError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            format: "JSON".to_string(),
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RepoLinesError {
    fn from(err: serde_json::Error) -> Self {
        InfrastructureError::from(err).into()
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for InfrastructureError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError {
            format: "YAML".to_string(),
            details: err.to_string(),
        }
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for RepoLinesError {
    fn from(err: serde_yaml::Error) -> Self {
        InfrastructureError::from(err).into()
    }
}

/// Extension trait to add additional context to results.
pub trait ErrorContext<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<RepoLinesError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| RepoLinesError::Context {
            context: context.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| RepoLinesError::Context {
            context: f(),
            source: Box::new(e.into()),
        })
    }
}

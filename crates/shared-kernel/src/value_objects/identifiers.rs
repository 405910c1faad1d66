// crates/shared-kernel/src/value_objects/identifiers.rs
use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

const MAX_LOGIN_LEN: usize = 39;
const MAX_REPO_NAME_LEN: usize = 100;

static LOGIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-])*[a-zA-Z0-9]$").expect("valid login pattern"));

static REPO_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid repository pattern"));

/// Owner of the repositories being analysed (user or organization login).
///
/// The original casing is kept for remote calls; [`AccountId::normalized`]
/// is what cache keys are built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn parse(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        validate_login(&raw)?;
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `owner/name` pair identifying one repository on the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> DomainResult<Self> {
        let owner = owner.into();
        let name = name.into();
        validate_login(&owner)?;
        validate_repo_name(&name)?;
        Ok(Self { owner, name })
    }

    /// Parse an `owner/name` string.
    pub fn parse(full_name: &str) -> DomainResult<Self> {
        let Some((owner, name)) = full_name.split_once('/') else {
            return Err(DomainError::InvalidIdentifier {
                value: full_name.to_string(),
                reason: "expected owner/name".to_string(),
            });
        };
        Self::new(owner, name)
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn normalized(&self) -> String {
        self.full_name().to_lowercase()
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn validate_login(raw: &str) -> DomainResult<()> {
    if raw.len() > MAX_LOGIN_LEN || !LOGIN_PATTERN.is_match(raw) {
        return Err(DomainError::InvalidIdentifier {
            value: raw.to_string(),
            reason: format!("must be 2-{MAX_LOGIN_LEN} alphanumeric characters or inner hyphens"),
        });
    }
    Ok(())
}

fn validate_repo_name(raw: &str) -> DomainResult<()> {
    if raw.len() > MAX_REPO_NAME_LEN || matches!(raw, "." | "..") || !REPO_NAME_PATTERN.is_match(raw) {
        return Err(DomainError::InvalidIdentifier {
            value: raw.to_string(),
            reason: "repository names use letters, digits, '.', '_' or '-'".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_keeps_casing_but_normalizes_for_keys() {
        let id = AccountId::parse("OctoCat").unwrap();
        assert_eq!(id.as_str(), "OctoCat");
        assert_eq!(id.normalized(), "octocat");
    }

    #[test]
    fn account_rejects_edge_hyphens_and_long_names() {
        assert!(AccountId::parse("-octo").is_err());
        assert!(AccountId::parse("octo-").is_err());
        assert!(AccountId::parse("a".repeat(40)).is_err());
        assert!(AccountId::parse("a-b").is_ok());
    }

    #[test]
    fn repo_ref_parses_full_name() {
        let repo = RepoRef::parse("rust-lang/rust.vim").unwrap();
        assert_eq!(repo.owner, "rust-lang");
        assert_eq!(repo.name, "rust.vim");
        assert_eq!(repo.to_string(), "rust-lang/rust.vim");
        assert!(RepoRef::parse("no-slash").is_err());
        assert!(RepoRef::parse("owner/..").is_err());
    }
}

// crates/infra/src/fixture.rs
//! JSON-described in-memory host.
//!
//! ```json
//! {
//!   "accounts": { "octo": [{ "name": "demo", "size": 12, "stars": 3 }] },
//!   "repositories": {
//!     "octo/demo": {
//!       "languages": { "Rust": 1200 },
//!       "files": { "src/main.rs": "fn main() {}", "blob.rs": { "size": 20000000 } },
//!       "failingDirectories": { "vendored": "transient" }
//!     }
//!   },
//!   "quota": { "remaining": 5000, "readsBeforeExhaustion": 2, "resetAt": "2026-01-01T00:00:00Z" }
//! }
//! ```

use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
    sync::atomic::{AtomicU32, AtomicU64, Ordering},
};

use chrono::{DateTime, Utc};
use repo_lines_ports::{
    AccountProvider, ContentTreeProvider, DeclaredLanguageProvider, DeclaredLanguages, EntryKind, Metered, Quota,
    RepoMeta, TreeEntry,
};
use repo_lines_shared_kernel::{
    AccountId, ErrorContext, ProviderError, ProviderResult, RepoRef, Result,
};
use serde::Deserialize;

use crate::persistence::FileReader;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureRepo {
    name: String,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    stars: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    Text(String),
    Detailed {
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        size: Option<u64>,
    },
}

impl FixtureFile {
    fn content(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Detailed { content, .. } => content.as_deref(),
        }
    }

    fn reported_size(&self) -> u64 {
        match self {
            Self::Text(text) => text.len() as u64,
            Self::Detailed { size: Some(size), .. } => *size,
            Self::Detailed { content, .. } => content.as_ref().map_or(0, |c| c.len() as u64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
enum FixtureFailure {
    NotFound,
    Transient,
}

impl FixtureFailure {
    fn to_error(self, resource: String) -> ProviderError {
        match self {
            Self::NotFound => ProviderError::not_found(resource),
            Self::Transient => ProviderError::transient(resource, "injected failure"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureTree {
    #[serde(default)]
    languages: Option<DeclaredLanguages>,
    #[serde(default)]
    files: BTreeMap<String, FixtureFile>,
    #[serde(default)]
    failing_directories: BTreeMap<String, FixtureFailure>,
    #[serde(default)]
    failing_reads: BTreeMap<String, FixtureFailure>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureQuota {
    /// Calls answered before the budget reports zero.
    #[serde(default)]
    remaining: Option<u32>,
    /// File reads answered before every further call fails with
    /// `QuotaExceeded`.
    #[serde(default)]
    reads_before_exhaustion: Option<u32>,
    reset_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureDocument {
    #[serde(default)]
    accounts: BTreeMap<String, Vec<FixtureRepo>>,
    #[serde(default)]
    repositories: BTreeMap<String, FixtureTree>,
    #[serde(default)]
    quota: Option<FixtureQuota>,
}

/// In-memory host implementing every provider port, with injectable
/// failures and a simulated rate limit.
///
/// Account and repository names match case-insensitively.
#[derive(Debug)]
pub struct FixtureHost {
    accounts: BTreeMap<String, (String, Vec<FixtureRepo>)>,
    repositories: BTreeMap<String, FixtureTree>,
    quota: Option<FixtureQuota>,
    calls: AtomicU32,
    reads: AtomicU32,
    listings: AtomicU64,
}

impl FixtureHost {
    pub fn from_json(json: &str) -> Result<Self> {
        let document: FixtureDocument = serde_json::from_str(json).context("parsing fixture")?;
        Ok(Self::from_document(document))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = FileReader::read_to_string(path)?;
        Self::from_json(&json).with_context(|| format!("loading fixture {}", path.display()))
    }

    fn from_document(document: FixtureDocument) -> Self {
        let accounts = document
            .accounts
            .into_iter()
            .map(|(login, repos)| (login.to_lowercase(), (login, repos)))
            .collect();
        let repositories =
            document.repositories.into_iter().map(|(name, tree)| (name.to_lowercase(), tree)).collect();
        Self {
            accounts,
            repositories,
            quota: document.quota,
            calls: AtomicU32::new(0),
            reads: AtomicU32::new(0),
            listings: AtomicU64::new(0),
        }
    }

    /// Directory listings served so far.
    pub fn listings_served(&self) -> u64 {
        self.listings.load(Ordering::SeqCst)
    }

    /// File reads attempted so far.
    pub fn reads_served(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }

    fn tree(&self, repo: &RepoRef) -> ProviderResult<&FixtureTree> {
        self.repositories.get(&repo.normalized()).ok_or_else(|| ProviderError::not_found(repo.full_name()))
    }

    /// Charge one call against the simulated budget.
    fn meter<T>(&self, value: T) -> ProviderResult<Metered<T>> {
        let calls = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let Some(quota) = &self.quota else {
            return Ok(Metered::unmetered(value));
        };
        if quota.reads_before_exhaustion.is_some_and(|allowed| self.reads.load(Ordering::SeqCst) > allowed) {
            return Err(ProviderError::QuotaExceeded { reset_at: quota.reset_at });
        }
        match quota.remaining {
            Some(budget) if calls > budget => Err(ProviderError::QuotaExceeded { reset_at: quota.reset_at }),
            Some(budget) => {
                let remaining = Quota { remaining: budget - calls, reset_at: quota.reset_at };
                Ok(Metered::new(value, Some(remaining)))
            }
            None => Ok(Metered::unmetered(value)),
        }
    }
}

impl ContentTreeProvider for FixtureHost {
    fn list_directory(&self, repo: &RepoRef, path: &str) -> ProviderResult<Metered<Vec<TreeEntry>>> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        let tree = self.tree(repo)?;
        if let Some(failure) = tree.failing_directories.get(path) {
            return Err(failure.to_error(format!("{repo}:{path}")));
        }

        let prefix = if path.is_empty() { String::new() } else { format!("{path}/") };
        let mut dirs = BTreeSet::new();
        let mut entries = Vec::new();
        for (file_path, file) in &tree.files {
            let Some(rest) = file_path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    dirs.insert(dir.to_string());
                }
                None => entries.push(TreeEntry {
                    name: rest.to_string(),
                    path: file_path.clone(),
                    kind: EntryKind::File,
                    size: file.reported_size(),
                }),
            }
        }
        if !path.is_empty() && entries.is_empty() && dirs.is_empty() {
            return Err(ProviderError::not_found(format!("{repo}:{path}")));
        }
        entries.extend(dirs.into_iter().map(|dir| TreeEntry {
            path: format!("{prefix}{dir}"),
            name: dir,
            kind: EntryKind::Dir,
            size: 0,
        }));
        self.meter(entries)
    }

    fn read_file(&self, repo: &RepoRef, path: &str) -> ProviderResult<Metered<Option<String>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let tree = self.tree(repo)?;
        if let Some(failure) = tree.failing_reads.get(path) {
            return Err(failure.to_error(format!("{repo}:{path}")));
        }
        let content = tree.files.get(path).and_then(|file| file.content().map(str::to_string));
        self.meter(content)
    }
}

impl DeclaredLanguageProvider for FixtureHost {
    fn repo_languages(&self, repo: &RepoRef) -> ProviderResult<Metered<DeclaredLanguages>> {
        let tree = self.tree(repo)?;
        self.meter(tree.languages.clone().unwrap_or_default())
    }
}

impl AccountProvider for FixtureHost {
    fn repositories_page(
        &self,
        account: &AccountId,
        page: u32,
        per_page: u32,
    ) -> ProviderResult<Metered<Vec<RepoMeta>>> {
        let Some((owner, repos)) = self.accounts.get(&account.normalized()) else {
            return Err(ProviderError::not_found(account.as_str()));
        };
        let start = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
        let page = repos
            .iter()
            .skip(start)
            .take(per_page as usize)
            .map(|repo| RepoMeta {
                name: repo.name.clone(),
                owner: owner.clone(),
                fork: repo.fork,
                size: repo.size,
                updated_at: repo.updated_at,
                stars: repo.stars,
            })
            .collect();
        self.meter(page)
    }
}

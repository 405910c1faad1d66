//! In-memory host used by this crate's unit tests.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::{
        Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use chrono::{DateTime, TimeZone, Utc};
use repo_lines_ports::{
    AccountProvider, Clock, ContentTreeProvider, DeclaredLanguageProvider, DeclaredLanguages, EntryKind, Metered,
    RepoMeta, TreeEntry,
};
use repo_lines_shared_kernel::{AccountId, ProviderError, ProviderResult, RepoRef};

pub fn repo(owner: &str, name: &str) -> RepoRef {
    RepoRef::new(owner, name).unwrap()
}

pub fn meta(owner: &str, name: &str, size: u64) -> RepoMeta {
    RepoMeta { name: name.into(), owner: owner.into(), fork: false, size, updated_at: None, stars: 0 }
}

#[derive(Debug)]
pub struct FixedClock(DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap())
    }
}

impl FixedClock {
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

struct StubFile {
    content: Option<String>,
    size: u64,
}

#[derive(Default)]
pub struct StubHost {
    files: BTreeMap<String, BTreeMap<String, StubFile>>,
    accounts: HashMap<String, Vec<RepoMeta>>,
    declared: HashMap<String, DeclaredLanguages>,
    failing_dirs: HashMap<String, ProviderError>,
    failing_repos: HashMap<String, ProviderError>,
    quota_after_reads: Option<u32>,
    reads: AtomicU32,
    pages: AtomicU32,
    listed: Mutex<Vec<(String, String)>>,
    read_paths: Mutex<Vec<String>>,
}

impl StubHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(self, repo: &str, path: &str, content: &str) -> Self {
        let size = content.len() as u64;
        self.file_with_size(repo, path, content, size)
    }

    pub fn file_with_size(mut self, repo: &str, path: &str, content: &str, size: u64) -> Self {
        let file = StubFile { content: Some(content.to_string()), size };
        self.files.entry(repo.to_string()).or_default().insert(path.to_string(), file);
        self
    }

    pub fn unreadable(mut self, repo: &str, path: &str) -> Self {
        let file = StubFile { content: None, size: 0 };
        self.files.entry(repo.to_string()).or_default().insert(path.to_string(), file);
        self
    }

    pub fn account(mut self, login: &str, repos: Vec<RepoMeta>) -> Self {
        self.accounts.insert(login.to_lowercase(), repos);
        self
    }

    pub fn declared(mut self, repo: &str, totals: &[(&str, u64)]) -> Self {
        let totals = totals.iter().map(|(label, bytes)| (label.to_string(), *bytes)).collect();
        self.declared.insert(repo.to_string(), totals);
        self
    }

    /// Listing `path` fails in every repository.
    pub fn failing_dir(mut self, path: &str, err: ProviderError) -> Self {
        self.failing_dirs.insert(path.to_string(), err);
        self
    }

    /// Listing the root of `repo` fails.
    pub fn failing_repo(mut self, repo: &str, err: ProviderError) -> Self {
        self.failing_repos.insert(repo.to_string(), err);
        self
    }

    /// Reads beyond the first `allowed` answer with an exhausted quota.
    pub fn quota_after_reads(mut self, allowed: u32) -> Self {
        self.quota_after_reads = Some(allowed);
        self
    }

    pub fn listed(&self, path: &str) -> bool {
        self.listed.lock().unwrap().iter().any(|(_, listed)| listed == path)
    }

    pub fn listed_repo(&self, repo: &str) -> bool {
        self.listed.lock().unwrap().iter().any(|(listed, _)| listed == repo)
    }

    pub fn reads_of(&self, path: &str) -> usize {
        self.read_paths.lock().unwrap().iter().filter(|read| *read == path).count()
    }

    pub fn pages_requested(&self) -> u32 {
        self.pages.load(Ordering::SeqCst)
    }

    fn reset_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 13, 0, 0).unwrap()
    }
}

impl ContentTreeProvider for StubHost {
    fn list_directory(&self, repo: &RepoRef, path: &str) -> ProviderResult<Metered<Vec<TreeEntry>>> {
        let full_name = repo.full_name();
        self.listed.lock().unwrap().push((full_name.clone(), path.to_string()));
        if let Some(err) = self.failing_repos.get(&full_name).filter(|_| path.is_empty()) {
            return Err(err.clone());
        }
        if let Some(err) = self.failing_dirs.get(path) {
            return Err(err.clone());
        }
        let Some(files) = self.files.get(&full_name) else {
            return Err(ProviderError::not_found(full_name));
        };

        let prefix = if path.is_empty() { String::new() } else { format!("{path}/") };
        let mut dirs = BTreeSet::new();
        let mut entries = Vec::new();
        for (file_path, file) in files {
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
                    size: file.size,
                }),
            }
        }
        for dir in dirs {
            entries.push(TreeEntry { path: format!("{prefix}{dir}"), name: dir, kind: EntryKind::Dir, size: 0 });
        }
        Ok(Metered::unmetered(entries))
    }

    fn read_file(&self, repo: &RepoRef, path: &str) -> ProviderResult<Metered<Option<String>>> {
        self.read_paths.lock().unwrap().push(path.to_string());
        let count = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.quota_after_reads.is_some_and(|allowed| count > allowed) {
            return Err(ProviderError::QuotaExceeded { reset_at: Self::reset_at() });
        }
        let content = self
            .files
            .get(&repo.full_name())
            .and_then(|files| files.get(path))
            .and_then(|file| file.content.clone());
        Ok(Metered::unmetered(content))
    }
}

impl DeclaredLanguageProvider for StubHost {
    fn repo_languages(&self, repo: &RepoRef) -> ProviderResult<Metered<DeclaredLanguages>> {
        Ok(Metered::unmetered(self.declared.get(&repo.full_name()).cloned().unwrap_or_default()))
    }
}

impl AccountProvider for StubHost {
    fn repositories_page(
        &self,
        account: &AccountId,
        page: u32,
        per_page: u32,
    ) -> ProviderResult<Metered<Vec<RepoMeta>>> {
        self.pages.fetch_add(1, Ordering::SeqCst);
        let Some(repos) = self.accounts.get(&account.normalized()) else {
            return Err(ProviderError::not_found(account.as_str()));
        };
        let start = ((page.max(1) - 1) * per_page) as usize;
        let page: Vec<RepoMeta> = repos.iter().skip(start).take(per_page as usize).cloned().collect();
        Ok(Metered::unmetered(page))
    }
}

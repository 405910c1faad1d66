// crates/usecase/src/tree_walker.rs
use std::collections::VecDeque;

use rayon::prelude::*;
use repo_lines_domain::{
    Interruption, LanguageMap, LanguageTable, LineTally, SkipDiagnostics, SkipReason, accumulate,
};
use repo_lines_ports::{ContentTreeProvider, DeclaredLanguageProvider, EntryKind, TreeEntry};
use repo_lines_shared_kernel::{EntityKind, ErrorContext, ProviderError, RepoLinesError, RepoRef, Result};

use crate::{
    pool::WorkerPool,
    scope::{CallError, RequestScope},
};

/// Statistics for one repository plus everything the walk had to leave out.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    pub languages: LanguageMap,
    pub diagnostics: SkipDiagnostics,
    pub interruption: Option<Interruption>,
    /// `false` when the walk was interrupted before the root was listed.
    pub traversed: bool,
}

impl WalkOutcome {
    fn interrupted_early(languages: LanguageMap, interruption: Interruption) -> Self {
        Self { languages, diagnostics: SkipDiagnostics::new(), interruption: Some(interruption), traversed: false }
    }
}

/// A file that passed classification and still has to be fetched.
struct PendingFile {
    path: String,
    language: &'static str,
    reported_size: u64,
}

enum FileOutcome {
    Counted { tally: LineTally, bytes: u64 },
    Skipped(SkipReason),
    Interrupted(Interruption),
}

/// Breadth-first traversal of one repository's content tree.
///
/// Directory listings and file reads are issued in batches on the shared
/// worker pool; the pool size caps how many calls are in flight.
pub struct TreeWalker<'a> {
    tree: &'a dyn ContentTreeProvider,
    declared: Option<&'a dyn DeclaredLanguageProvider>,
    table: &'a LanguageTable,
    pool: &'a WorkerPool,
    max_file_size: u64,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        tree: &'a dyn ContentTreeProvider,
        table: &'a LanguageTable,
        pool: &'a WorkerPool,
        max_file_size: u64,
    ) -> Self {
        Self { tree, declared: None, table, pool, max_file_size }
    }

    /// Seed every walk with the host's declared language byte totals.
    pub fn with_declared(mut self, declared: &'a dyn DeclaredLanguageProvider) -> Self {
        self.declared = Some(declared);
        self
    }

    pub fn walk(&self, repo: &RepoRef, scope: &RequestScope<'_>) -> Result<WalkOutcome> {
        let mut languages = LanguageMap::new();
        if let Some(interruption) = self.seed_declared(repo, scope, &mut languages) {
            return Ok(WalkOutcome::interrupted_early(languages, interruption));
        }

        let root = match scope.call(|| self.tree.list_directory(repo, "")) {
            Ok(entries) => entries,
            Err(CallError::Interrupted(interruption)) => {
                return Ok(WalkOutcome::interrupted_early(languages, interruption));
            }
            Err(CallError::Provider(ProviderError::NotFound { .. })) => {
                return Err(RepoLinesError::NotFound { entity: EntityKind::Repository, id: repo.full_name() });
            }
            Err(CallError::Provider(err)) => {
                return Err(err).with_context(|| format!("listing root of {repo}"));
            }
        };

        let mut outcome = WalkOutcome { languages, traversed: true, ..WalkOutcome::default() };
        let mut dirs = VecDeque::new();
        let mut files = VecDeque::new();
        self.absorb_listing(root, &mut dirs, &mut files, &mut outcome.diagnostics);

        let batch = self.pool.batch_size();
        while outcome.interruption.is_none() {
            if !files.is_empty() {
                let take = batch.min(files.len());
                let round: Vec<PendingFile> = files.drain(..take).collect();
                self.read_round(repo, scope, round, &mut outcome);
            } else if !dirs.is_empty() {
                let take = batch.min(dirs.len());
                let round: Vec<String> = dirs.drain(..take).collect();
                self.list_round(repo, scope, round, &mut dirs, &mut files, &mut outcome);
            } else {
                break;
            }
        }

        for file in files {
            outcome.diagnostics.record(SkipReason::NotStarted, file.path);
        }
        for dir in dirs {
            outcome.diagnostics.record(SkipReason::NotStarted, dir);
        }
        Ok(outcome)
    }

    /// Returns the interruption if the seeding call was refused.
    fn seed_declared(
        &self,
        repo: &RepoRef,
        scope: &RequestScope<'_>,
        languages: &mut LanguageMap,
    ) -> Option<Interruption> {
        let declared = self.declared?;
        match scope.call(|| declared.repo_languages(repo)) {
            Ok(totals) => {
                languages.seed_declared(totals);
                None
            }
            Err(CallError::Interrupted(interruption)) => Some(interruption),
            Err(CallError::Provider(err)) => {
                log::warn!("declared languages of {repo} unavailable: {err}");
                None
            }
        }
    }

    fn absorb_listing(
        &self,
        entries: Vec<TreeEntry>,
        dirs: &mut VecDeque<String>,
        files: &mut VecDeque<PendingFile>,
        diagnostics: &mut SkipDiagnostics,
    ) {
        for entry in entries {
            match entry.kind {
                EntryKind::Dir => {
                    if !self.table.is_ignored_directory(&entry.name) {
                        dirs.push_back(entry.path);
                    }
                }
                EntryKind::File => {
                    let Some(language) = self.table.classify(&entry.name) else {
                        continue;
                    };
                    if entry.size > self.max_file_size {
                        log::debug!("skipping {} ({} bytes)", entry.path, entry.size);
                        diagnostics.record(SkipReason::Oversized, entry.path);
                        continue;
                    }
                    files.push_back(PendingFile { path: entry.path, language, reported_size: entry.size });
                }
            }
        }
    }

    fn read_round(&self, repo: &RepoRef, scope: &RequestScope<'_>, round: Vec<PendingFile>, outcome: &mut WalkOutcome) {
        let results: Vec<FileOutcome> =
            self.pool.install(|| round.par_iter().map(|file| self.read_one(repo, scope, file)).collect());

        for (file, result) in round.into_iter().zip(results) {
            match result {
                FileOutcome::Counted { tally, bytes } => outcome.languages.record_file(file.language, tally, bytes),
                FileOutcome::Skipped(reason) => outcome.diagnostics.record(reason, file.path),
                FileOutcome::Interrupted(interruption) => {
                    outcome.diagnostics.record(SkipReason::NotStarted, file.path);
                    note_interruption(&mut outcome.interruption, interruption);
                }
            }
        }
    }

    fn read_one(&self, repo: &RepoRef, scope: &RequestScope<'_>, file: &PendingFile) -> FileOutcome {
        match scope.call(|| self.tree.read_file(repo, &file.path)) {
            Ok(Some(content)) if content.is_empty() => FileOutcome::Skipped(SkipReason::Empty),
            Ok(Some(content)) => {
                let bytes = file.reported_size.max(content.len() as u64);
                FileOutcome::Counted { tally: accumulate(&content), bytes }
            }
            Ok(None) => {
                log::debug!("no content for {repo}:{}", file.path);
                FileOutcome::Skipped(SkipReason::Unreadable)
            }
            Err(CallError::Interrupted(interruption)) => FileOutcome::Interrupted(interruption),
            Err(CallError::Provider(err)) => {
                log::debug!("failed to read {repo}:{}: {err}", file.path);
                FileOutcome::Skipped(SkipReason::Unreadable)
            }
        }
    }

    fn list_round(
        &self,
        repo: &RepoRef,
        scope: &RequestScope<'_>,
        round: Vec<String>,
        dirs: &mut VecDeque<String>,
        files: &mut VecDeque<PendingFile>,
        outcome: &mut WalkOutcome,
    ) {
        let results: Vec<std::result::Result<Vec<TreeEntry>, CallError>> = self.pool.install(|| {
            round.par_iter().map(|path| scope.call(|| self.tree.list_directory(repo, path))).collect()
        });

        for (path, result) in round.into_iter().zip(results) {
            match result {
                Ok(entries) => self.absorb_listing(entries, dirs, files, &mut outcome.diagnostics),
                Err(CallError::Interrupted(interruption)) => {
                    outcome.diagnostics.record(SkipReason::NotStarted, path);
                    note_interruption(&mut outcome.interruption, interruption);
                }
                Err(CallError::Provider(ProviderError::NotFound { .. })) => {
                    log::warn!("directory {repo}:{path} disappeared; skipping subtree");
                    outcome.diagnostics.record(SkipReason::DirectoryMissing, path);
                }
                Err(CallError::Provider(err)) => {
                    log::warn!("cannot list {repo}:{path}: {err}; skipping subtree");
                    outcome.diagnostics.record(SkipReason::DirectoryUnavailable, path);
                }
            }
        }
    }
}

fn note_interruption(slot: &mut Option<Interruption>, interruption: Interruption) {
    *slot = Some(match *slot {
        Some(current) => current.combine(interruption),
        None => interruption,
    });
}

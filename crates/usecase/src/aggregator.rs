// crates/usecase/src/aggregator.rs
use rayon::prelude::*;
use repo_lines_domain::{AccountSnapshot, Interruption, LanguageMap, RepositoryRecord, SkipDiagnostics, SkipReason};
use repo_lines_ports::RepoMeta;
use repo_lines_shared_kernel::{AccountId, RepoRef, Result};

use crate::{
    catalog::RepositoryCatalog,
    pool::WorkerPool,
    scope::RequestScope,
    tree_walker::{TreeWalker, WalkOutcome},
};

/// A computed value with the diagnostics of the run that produced it.
#[derive(Debug, Clone)]
pub struct AggregateOutcome<T> {
    pub value: T,
    pub diagnostics: SkipDiagnostics,
    pub interruption: Option<Interruption>,
}

impl<T> AggregateOutcome<T> {
    pub fn is_complete(&self) -> bool {
        self.interruption.is_none()
    }
}

impl From<WalkOutcome> for AggregateOutcome<LanguageMap> {
    fn from(outcome: WalkOutcome) -> Self {
        Self { value: outcome.languages, diagnostics: outcome.diagnostics, interruption: outcome.interruption }
    }
}

enum RepoWalk {
    Walked(WalkOutcome),
    Failed(String),
    NotStarted(Interruption),
}

/// Combines the per-repository walks of one account into a snapshot.
pub struct AccountAggregator<'a> {
    catalog: RepositoryCatalog<'a>,
    walker: TreeWalker<'a>,
    pool: &'a WorkerPool,
}

impl<'a> AccountAggregator<'a> {
    pub fn new(catalog: RepositoryCatalog<'a>, walker: TreeWalker<'a>, pool: &'a WorkerPool) -> Self {
        Self { catalog, walker, pool }
    }

    pub fn aggregate(
        &self,
        account: &AccountId,
        scope: &RequestScope<'_>,
    ) -> Result<AggregateOutcome<AccountSnapshot>> {
        let listing = self.catalog.list(account, scope)?;
        let total_repos = listing.repositories.len();
        let mut diagnostics = SkipDiagnostics::new();
        let mut interruption = listing.interruption;

        let candidates: Vec<&RepoMeta> = listing.repositories.iter().filter(|meta| meta.size > 0).collect();
        log::info!("aggregating {} of {total_repos} repositories for {account}", candidates.len());

        let walks: Vec<RepoWalk> = match interruption {
            Some(cause) => candidates.iter().map(|_| RepoWalk::NotStarted(cause)).collect(),
            None => self.pool.install(|| candidates.par_iter().map(|meta| self.walk_one(meta, scope)).collect()),
        };

        let mut records = Vec::with_capacity(candidates.len());
        for (meta, walk) in candidates.into_iter().zip(walks) {
            match walk {
                RepoWalk::Walked(outcome) => {
                    if let Some(cause) = outcome.interruption {
                        interruption = Some(interruption.map_or(cause, |current| current.combine(cause)));
                    }
                    diagnostics.merge(outcome.diagnostics);
                    if outcome.traversed {
                        records.push(record_for(meta, outcome.languages));
                    } else {
                        diagnostics.record(SkipReason::NotStarted, meta.full_name());
                    }
                }
                RepoWalk::Failed(reason) => {
                    log::warn!("skipping repository {}: {reason}", meta.full_name());
                    diagnostics.record(SkipReason::RepositoryFailed, meta.full_name());
                }
                RepoWalk::NotStarted(cause) => {
                    interruption = Some(interruption.map_or(cause, |current| current.combine(cause)));
                    diagnostics.record(SkipReason::NotStarted, meta.full_name());
                }
            }
        }

        let snapshot = AccountSnapshot::assemble(account.as_str(), total_repos, records, scope.clock().now());
        log::info!(
            "account {account}: {} repositories processed, {} languages",
            snapshot.processed_repos,
            snapshot.total_languages
        );
        Ok(AggregateOutcome { value: snapshot, diagnostics, interruption })
    }

    fn walk_one(&self, meta: &RepoMeta, scope: &RequestScope<'_>) -> RepoWalk {
        if let Err(cause) = scope.admit() {
            return RepoWalk::NotStarted(cause);
        }
        let repo = match RepoRef::new(meta.owner.as_str(), meta.name.as_str()) {
            Ok(repo) => repo,
            Err(err) => return RepoWalk::Failed(err.to_string()),
        };
        match self.walker.walk(&repo, scope) {
            Ok(outcome) => RepoWalk::Walked(outcome),
            Err(err) => RepoWalk::Failed(err.to_string()),
        }
    }
}

fn record_for(meta: &RepoMeta, languages: LanguageMap) -> RepositoryRecord {
    RepositoryRecord {
        name: meta.name.clone(),
        full_name: meta.full_name(),
        languages,
        updated_at: meta.updated_at,
        size: meta.size,
        stars: meta.stars,
    }
}

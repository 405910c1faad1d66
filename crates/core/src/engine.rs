// crates/core/src/engine.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use repo_lines_domain::{
    AccountSnapshot, Completeness, EngineConfig, Interruption, LanguageMap, LanguageTable, SkipDiagnostics,
};
use repo_lines_infra::{CacheKey, CacheStats, CacheSweeper, Cached, Expiring, ResultCache, SystemClock};
use repo_lines_ports::{AccountProvider, Clock, ContentTreeProvider, DeclaredLanguageProvider, Quota};
use repo_lines_shared_kernel::{AccountId, DomainError, RepoLinesError, RepoRef, Result};
use repo_lines_usecase::{
    AccountAggregator, AggregateOutcome, Deadline, QuotaGate, RepositoryCatalog, RequestScope, TreeWalker, WorkerPool,
};
use serde::Serialize;

use crate::request::{RequestOptions, Served};

/// Last quota the host reported and whether calls are currently suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    pub last_seen: Option<Quota>,
    pub suspended_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineCacheStats {
    pub accounts: CacheStats,
    pub repositories: CacheStats,
    pub healthy: bool,
}

/// Wires providers, cache, worker pool and quota gate together and serves
/// account snapshots and repository statistics.
///
/// One engine is meant to live for the whole process; concurrent callers
/// share its cache, pool and gate.
pub struct StatsEngine {
    config: EngineConfig,
    tree: Arc<dyn ContentTreeProvider>,
    accounts: Option<Arc<dyn AccountProvider>>,
    declared: Option<Arc<dyn DeclaredLanguageProvider>>,
    clock: Arc<dyn Clock>,
    table: &'static LanguageTable,
    pool: WorkerPool,
    gate: QuotaGate,
    account_cache: Arc<ResultCache<Arc<AccountSnapshot>>>,
    repo_cache: Arc<ResultCache<Arc<LanguageMap>>>,
    _sweeper: Option<CacheSweeper>,
}

impl StatsEngine {
    pub fn builder(tree: Arc<dyn ContentTreeProvider>) -> StatsEngineBuilder {
        StatsEngineBuilder {
            tree,
            accounts: None,
            declared: None,
            clock: None,
            config: EngineConfig::default(),
            sweep: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Defaults for [`Self::account_snapshot_with`] and [`Self::repo_stats_with`].
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions::from_config(&self.config)
    }

    pub fn get_account_snapshot(&self, account_id: &str, bypass_cache: bool) -> Result<Arc<AccountSnapshot>> {
        let options = self.request_options().bypass_cache(bypass_cache);
        self.account_snapshot_with(account_id, &options).map(|served| served.value)
    }

    pub fn get_repo_stats(&self, owner: &str, repo: &str, bypass_cache: bool) -> Result<Arc<LanguageMap>> {
        let options = self.request_options().bypass_cache(bypass_cache);
        self.repo_stats_with(owner, repo, &options).map(|served| served.value)
    }

    pub fn account_snapshot_with(
        &self,
        account_id: &str,
        options: &RequestOptions,
    ) -> Result<Served<Arc<AccountSnapshot>>> {
        let account = AccountId::parse(account_id)?;
        let key = CacheKey::account(&account);
        if let Some(hit) = self.lookup(&self.account_cache, &key, options) {
            return Ok(hit);
        }

        let accounts = self.accounts.as_deref().ok_or_else(|| DomainError::InvalidConfiguration {
            reason: "no account provider configured".to_string(),
        })?;
        let deadline = Deadline::from_option(self.clock.now(), options.deadline);
        let scope = RequestScope::new(&self.gate, self.clock.as_ref(), deadline);
        let catalog = RepositoryCatalog::new(accounts, self.config.page_size, self.config.max_repos);
        let aggregator = AccountAggregator::new(catalog, self.walker(), &self.pool);

        let outcome = aggregator.aggregate(&account, &scope)?;
        self.settle(outcome, &self.account_cache, key, deadline, options)
    }

    pub fn repo_stats_with(
        &self,
        owner: &str,
        repo: &str,
        options: &RequestOptions,
    ) -> Result<Served<Arc<LanguageMap>>> {
        let repo = RepoRef::new(owner, repo)?;
        let key = CacheKey::repo(&repo);
        if let Some(hit) = self.lookup(&self.repo_cache, &key, options) {
            return Ok(hit);
        }

        let deadline = Deadline::from_option(self.clock.now(), options.deadline);
        let scope = RequestScope::new(&self.gate, self.clock.as_ref(), deadline);
        let outcome: AggregateOutcome<LanguageMap> = self.walker().walk(&repo, &scope)?.into();
        self.settle(outcome, &self.repo_cache, key, deadline, options)
    }

    pub fn rate_limit_status(&self) -> RateLimitStatus {
        RateLimitStatus { last_seen: self.gate.last_seen(), suspended_until: self.gate.suspended_until() }
    }

    pub fn cache_stats(&self) -> EngineCacheStats {
        EngineCacheStats {
            accounts: self.account_cache.stats(),
            repositories: self.repo_cache.stats(),
            healthy: self.account_cache.is_healthy() && self.repo_cache.is_healthy(),
        }
    }

    /// Drop every cached snapshot and repository map.
    pub fn flush_cache(&self) {
        self.account_cache.flush();
        self.repo_cache.flush();
    }

    pub fn supported_languages(&self) -> Vec<&'static str> {
        self.table.supported_languages()
    }

    fn walker(&self) -> TreeWalker<'_> {
        let walker = TreeWalker::new(self.tree.as_ref(), self.table, &self.pool, self.config.max_file_size);
        match self.declared.as_deref() {
            Some(declared) => walker.with_declared(declared),
            None => walker,
        }
    }

    fn lookup<V: Clone>(&self, cache: &ResultCache<V>, key: &CacheKey, options: &RequestOptions) -> Option<Served<V>> {
        if options.bypass_cache {
            return None;
        }
        let Cached { value, stored_at } = cache.get(key)?;
        log::debug!("cache hit for {key}");
        let cache_age = (self.clock.now() - stored_at).to_std().unwrap_or_default();
        Some(Served {
            value,
            cached: true,
            cache_age: Some(cache_age),
            completeness: Completeness::Complete,
            diagnostics: SkipDiagnostics::new(),
        })
    }

    /// Apply the partial-result policy; only complete results are cached.
    fn settle<T>(
        &self,
        outcome: AggregateOutcome<T>,
        cache: &ResultCache<Arc<T>>,
        key: CacheKey,
        deadline: Deadline,
        options: &RequestOptions,
    ) -> Result<Served<Arc<T>>> {
        let AggregateOutcome { value, diagnostics, interruption } = outcome;
        if !diagnostics.is_empty() {
            log::info!("{key}: {} item(s) skipped", diagnostics.total());
        }

        let value = Arc::new(value);
        let completeness = match interruption {
            Some(cause) if !options.accept_partial => return Err(interruption_error(cause, deadline)),
            Some(cause) => {
                log::warn!("{key}: returning partial result ({cause:?})");
                Completeness::Partial { interruption: cause }
            }
            None => {
                cache.set(key, Arc::clone(&value));
                Completeness::Complete
            }
        };
        Ok(Served { value, cached: false, cache_age: None, completeness, diagnostics })
    }
}

/// Every language label the classifier can produce, sorted.
pub fn supported_languages() -> Vec<&'static str> {
    LanguageTable::builtin().supported_languages()
}

fn interruption_error(cause: Interruption, deadline: Deadline) -> RepoLinesError {
    match cause {
        Interruption::QuotaExceeded { reset_at } => RepoLinesError::QuotaExceeded { reset_at },
        Interruption::DeadlineExceeded => RepoLinesError::Timeout { after: deadline.budget().unwrap_or_default() },
    }
}

pub struct StatsEngineBuilder {
    tree: Arc<dyn ContentTreeProvider>,
    accounts: Option<Arc<dyn AccountProvider>>,
    declared: Option<Arc<dyn DeclaredLanguageProvider>>,
    clock: Option<Arc<dyn Clock>>,
    config: EngineConfig,
    sweep: bool,
}

impl StatsEngineBuilder {
    #[must_use]
    pub fn accounts(mut self, accounts: Arc<dyn AccountProvider>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    #[must_use]
    pub fn declared_languages(mut self, declared: Arc<dyn DeclaredLanguageProvider>) -> Self {
        self.declared = Some(declared);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Purge expired cache entries on a background thread.
    #[must_use]
    pub fn sweep_expired(mut self, sweep: bool) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn build(self) -> Result<StatsEngine> {
        self.config.validate()?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let pool = WorkerPool::new(self.config.jobs)?;
        let account_cache = Arc::new(ResultCache::new(Arc::clone(&clock), self.config.cache_ttl));
        let repo_cache = Arc::new(ResultCache::new(Arc::clone(&clock), self.config.cache_ttl));

        let sweeper = if self.sweep {
            let targets: Vec<Arc<dyn Expiring>> =
                vec![account_cache.clone() as Arc<dyn Expiring>, repo_cache.clone() as Arc<dyn Expiring>];
            Some(CacheSweeper::spawn(targets, CacheSweeper::period_for(self.config.cache_ttl))?)
        } else {
            None
        };

        log::debug!("engine ready: {} worker(s), cache ttl {:?}", pool.jobs(), self.config.cache_ttl);
        Ok(StatsEngine {
            config: self.config,
            tree: self.tree,
            accounts: self.accounts,
            declared: self.declared,
            clock,
            table: LanguageTable::builtin(),
            pool,
            gate: QuotaGate::new(),
            account_cache,
            repo_cache,
            _sweeper: sweeper,
        })
    }
}

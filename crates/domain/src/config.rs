use std::time::Duration;

use repo_lines_shared_kernel::{DomainError, DomainResult};

pub const DEFAULT_JOBS: usize = 4;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_MAX_REPOS: usize = 1000;
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Resolved engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Worker threads; also the cap on concurrent remote calls.
    pub jobs: usize,
    pub cache_ttl: Duration,
    /// Stop listing an account's repositories after this many.
    pub max_repos: usize,
    pub page_size: u32,
    /// Files reported larger than this are skipped without fetching.
    pub max_file_size: u64,
    pub request_deadline: Option<Duration>,
    pub accept_partial: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            jobs: DEFAULT_JOBS,
            cache_ttl: DEFAULT_CACHE_TTL,
            max_repos: DEFAULT_MAX_REPOS,
            page_size: DEFAULT_PAGE_SIZE,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            request_deadline: None,
            accept_partial: false,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.jobs == 0 {
            return Err(invalid("jobs must be at least 1"));
        }
        if self.cache_ttl.is_zero() {
            return Err(invalid("cache_ttl must be positive"));
        }
        if self.max_repos == 0 {
            return Err(invalid("max_repos must be at least 1"));
        }
        if !(1..=100).contains(&self.page_size) {
            return Err(invalid("page_size must be between 1 and 100"));
        }
        if self.max_file_size == 0 {
            return Err(invalid("max_file_size must be positive"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> DomainError {
    DomainError::InvalidConfiguration { reason: reason.to_string() }
}

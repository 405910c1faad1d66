// crates/core/src/request.rs
use std::time::Duration;

use repo_lines_domain::{Completeness, EngineConfig, SkipDiagnostics};

/// Per-call knobs; defaults come from the engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Recompute even when a fresh entry exists, then overwrite it.
    pub bypass_cache: bool,
    /// Return what was gathered when quota or deadline interrupts.
    pub accept_partial: bool,
    pub deadline: Option<Duration>,
}

impl RequestOptions {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self { bypass_cache: false, accept_partial: config.accept_partial, deadline: config.request_deadline }
    }

    #[must_use]
    pub fn bypass_cache(mut self, bypass: bool) -> Self {
        self.bypass_cache = bypass;
        self
    }

    #[must_use]
    pub fn accept_partial(mut self, accept: bool) -> Self {
        self.accept_partial = accept;
        self
    }

    #[must_use]
    pub fn deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}

/// A result plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Served<T> {
    pub value: T,
    pub cached: bool,
    /// Time since the entry was stored; `None` for fresh computations.
    pub cache_age: Option<Duration>,
    pub completeness: Completeness,
    /// Empty for cache hits.
    pub diagnostics: SkipDiagnostics,
}

impl<T> Served<T> {
    pub fn is_partial(&self) -> bool {
        !self.completeness.is_complete()
    }
}

//! # Core
//!
//! [`StatsEngine`] is the single entry point callers use: it owns the
//! worker pool, the quota gate and the result cache, and applies the
//! caching and partial-result policies on top of the use cases.
//!
//! [`Settings`] resolves an [`EngineConfig`] from a YAML file, environment
//! variables and caller overrides; [`bootstrap`] wires the bundled adapters.

// crates/core/src/lib.rs
#![allow(clippy::multiple_crate_versions)]

pub mod bootstrap;
pub mod engine;
pub mod request;
pub mod settings;

pub use engine::{EngineCacheStats, RateLimitStatus, StatsEngine, StatsEngineBuilder, supported_languages};
pub use repo_lines_domain::{AccountSnapshot, Completeness, EngineConfig, Interruption, LanguageMap, SkipDiagnostics};
pub use repo_lines_shared_kernel::{RepoLinesError, Result};
pub use request::{RequestOptions, Served};
pub use settings::Settings;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

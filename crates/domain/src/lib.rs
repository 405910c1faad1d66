#![allow(clippy::multiple_crate_versions)]

pub mod accumulate;
pub mod config;
pub mod diagnostics;
pub mod language;
pub mod line;
pub mod model;

pub use accumulate::{LineTally, accumulate};
pub use config::EngineConfig;
pub use diagnostics::{Completeness, Interruption, SkipDiagnostics, SkipReason};
pub use language::LanguageTable;
pub use line::{LineKind, classify_line};
pub use model::{
    AccountLanguageMap, AccountLanguageStats, AccountSnapshot, LanguageMap, LanguageStats, RepositoryRecord,
};

pub mod language_stats;
pub mod repository;
pub mod snapshot;

pub use language_stats::{AccountLanguageMap, AccountLanguageStats, LanguageMap, LanguageStats};
pub use repository::RepositoryRecord;
pub use snapshot::AccountSnapshot;

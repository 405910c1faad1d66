// crates/ports/src/languages.rs
use std::collections::BTreeMap;

use repo_lines_shared_kernel::{ProviderResult, RepoRef};

use crate::rate_limit::Metered;

/// Language label → byte count, as classified by the host itself.
pub type DeclaredLanguages = BTreeMap<String, u64>;

pub trait DeclaredLanguageProvider: Send + Sync {
    fn repo_languages(&self, repo: &RepoRef) -> ProviderResult<Metered<DeclaredLanguages>>;
}

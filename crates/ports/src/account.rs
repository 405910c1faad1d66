// crates/ports/src/account.rs
use chrono::{DateTime, Utc};
use repo_lines_shared_kernel::{AccountId, ProviderResult};
use serde::{Deserialize, Serialize};

use crate::rate_limit::Metered;

/// Repository metadata as listed for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoMeta {
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub fork: bool,
    /// Host-reported size; 0 means the repository is empty.
    #[serde(default)]
    pub size: u64,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stars: u64,
}

impl RepoMeta {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Port for listing the repositories of an account one page at a time.
///
/// Pages are 1-based. An unknown account is reported as
/// `ProviderError::NotFound`.
pub trait AccountProvider: Send + Sync {
    fn repositories_page(
        &self,
        account: &AccountId,
        page: u32,
        per_page: u32,
    ) -> ProviderResult<Metered<Vec<RepoMeta>>>;
}

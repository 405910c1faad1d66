use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AccountLanguageMap, RepositoryRecord};

/// Account-wide statistics as served to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub account_id: String,
    pub total_languages: usize,
    /// Non-fork repositories discovered, empty ones included.
    pub total_repos: usize,
    /// Repositories actually traversed.
    pub processed_repos: usize,
    pub languages: AccountLanguageMap,
    pub repositories: Vec<RepositoryRecord>,
    pub last_updated: DateTime<Utc>,
}

impl AccountSnapshot {
    /// Build a snapshot from the traversed repositories, in the order given.
    pub fn assemble(
        account_id: impl Into<String>,
        total_repos: usize,
        repositories: Vec<RepositoryRecord>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        let mut languages = AccountLanguageMap::new();
        for record in &repositories {
            languages.absorb_repository(&record.languages);
        }
        Self {
            account_id: account_id.into(),
            total_languages: languages.len(),
            total_repos,
            processed_repos: repositories.len(),
            languages,
            repositories,
            last_updated,
        }
    }

    pub fn total_lines(&self) -> u64 {
        self.languages.total_lines()
    }

    pub fn total_files(&self) -> u64 {
        self.languages.total_files()
    }
}

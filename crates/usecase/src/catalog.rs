// crates/usecase/src/catalog.rs
use repo_lines_domain::Interruption;
use repo_lines_ports::{AccountProvider, RepoMeta};
use repo_lines_shared_kernel::{AccountId, EntityKind, ErrorContext, ProviderError, RepoLinesError, Result};

use crate::scope::{CallError, RequestScope};

/// Non-fork repositories of an account, in listing order.
#[derive(Debug, Clone, Default)]
pub struct CatalogListing {
    pub repositories: Vec<RepoMeta>,
    /// Set when paging stopped early; `repositories` holds what was listed.
    pub interruption: Option<Interruption>,
}

/// Pages through an account's repositories up to a fixed cap.
pub struct RepositoryCatalog<'a> {
    provider: &'a dyn AccountProvider,
    page_size: u32,
    max_repos: usize,
}

impl<'a> RepositoryCatalog<'a> {
    pub fn new(provider: &'a dyn AccountProvider, page_size: u32, max_repos: usize) -> Self {
        Self { provider, page_size: page_size.max(1), max_repos }
    }

    pub fn list(&self, account: &AccountId, scope: &RequestScope<'_>) -> Result<CatalogListing> {
        let mut listed: Vec<RepoMeta> = Vec::new();
        let mut interruption = None;
        let mut page = 1;

        while listed.len() < self.max_repos {
            let batch = match scope.call(|| self.provider.repositories_page(account, page, self.page_size)) {
                Ok(batch) => batch,
                Err(CallError::Interrupted(cause)) => {
                    interruption = Some(cause);
                    break;
                }
                Err(CallError::Provider(ProviderError::NotFound { .. })) => {
                    return Err(RepoLinesError::NotFound { entity: EntityKind::Account, id: account.to_string() });
                }
                Err(CallError::Provider(err)) => {
                    return Err(err).with_context(|| format!("listing repositories of {account} (page {page})"));
                }
            };

            let short_page = batch.len() < self.page_size as usize;
            let room = self.max_repos - listed.len();
            listed.extend(batch.into_iter().take(room));
            if short_page {
                break;
            }
            page += 1;
        }

        log::debug!("listed {} repositories for {account}", listed.len());
        listed.retain(|repo| !repo.fork);
        Ok(CatalogListing { repositories: listed, interruption })
    }
}

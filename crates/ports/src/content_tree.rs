// crates/ports/src/content_tree.rs
use repo_lines_shared_kernel::{ProviderResult, RepoRef};
use serde::{Deserialize, Serialize};

use crate::rate_limit::Metered;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
}

/// One item of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    /// Repository-relative path, `/`-separated, no leading slash.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size reported by the host; 0 for directories.
    #[serde(default)]
    pub size: u64,
}

/// Port for browsing one repository's file tree.
pub trait ContentTreeProvider: Send + Sync {
    /// List the entries directly under `path` (`""` is the root).
    fn list_directory(&self, repo: &RepoRef, path: &str) -> ProviderResult<Metered<Vec<TreeEntry>>>;

    /// Fetch decoded file content. `None` means unreadable or too large;
    /// the caller skips the file rather than failing.
    fn read_file(&self, repo: &RepoRef, path: &str) -> ProviderResult<Metered<Option<String>>>;
}

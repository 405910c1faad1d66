// crates/infra/src/local_tree.rs
use std::{
    io,
    path::{Component, Path, PathBuf},
};

use repo_lines_ports::{ContentTreeProvider, EntryKind, Metered, TreeEntry};
use repo_lines_shared_kernel::{ProviderError, ProviderResult, RepoRef};

use crate::persistence::FileReader;

/// Serves a local checkout as a repository tree.
///
/// Every repository reference resolves to the same root. Symlinks are not
/// followed.
#[derive(Debug, Clone)]
pub struct LocalTree {
    root: PathBuf,
    max_file_size: u64,
}

impl LocalTree {
    pub fn new(root: impl Into<PathBuf>, max_file_size: u64) -> Self {
        Self { root: root.into(), max_file_size }
    }

    fn resolve(&self, path: &str) -> ProviderResult<PathBuf> {
        let relative = Path::new(path);
        if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Err(ProviderError::not_found(path));
        }
        Ok(self.root.join(relative))
    }
}

impl ContentTreeProvider for LocalTree {
    fn list_directory(&self, _repo: &RepoRef, path: &str) -> ProviderResult<Metered<Vec<TreeEntry>>> {
        let dir = self.resolve(path)?;
        let read_dir = std::fs::read_dir(&dir).map_err(|err| io_failure(path, &err))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|err| io_failure(path, &err))?;
            let file_type = entry.file_type().map_err(|err| io_failure(path, &err))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let child = if path.is_empty() { name.clone() } else { format!("{path}/{name}") };

            if file_type.is_dir() {
                entries.push(TreeEntry { name, path: child, kind: EntryKind::Dir, size: 0 });
            } else if file_type.is_file() {
                let size = entry.metadata().map(|meta| meta.len()).unwrap_or(0);
                entries.push(TreeEntry { name, path: child, kind: EntryKind::File, size });
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Metered::unmetered(entries))
    }

    fn read_file(&self, _repo: &RepoRef, path: &str) -> ProviderResult<Metered<Option<String>>> {
        let file = self.resolve(path)?;
        let content = FileReader::read_text_capped(&file, self.max_file_size).map_err(|err| io_failure(path, &err))?;
        Ok(Metered::unmetered(content))
    }
}

fn io_failure(path: &str, err: &io::Error) -> ProviderError {
    if err.kind() == io::ErrorKind::NotFound {
        ProviderError::not_found(path)
    } else {
        ProviderError::transient(path, err.to_string())
    }
}

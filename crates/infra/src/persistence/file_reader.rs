// crates/infra/src/persistence/file_reader.rs
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use repo_lines_shared_kernel::{InfraResult, InfrastructureError};

/// Convenience helpers for reading files with consistent error handling.
pub struct FileReader;

impl FileReader {
    /// Read the whole file as UTF-8, mapping failures to `FileRead`.
    pub fn read_to_string(path: &Path) -> InfraResult<String> {
        std::fs::read_to_string(path)
            .map_err(|source| InfrastructureError::FileRead { path: path.to_path_buf(), source })
    }

    /// Read at most `limit` bytes. `Ok(None)` when the file is larger than
    /// `limit` or not valid UTF-8.
    pub fn read_text_capped(path: &Path, limit: u64) -> io::Result<Option<String>> {
        let file = File::open(path)?;
        if file.metadata()?.len() > limit {
            return Ok(None);
        }
        let mut buf = Vec::new();
        // a file may grow between the size check and the read
        file.take(limit.saturating_add(1)).read_to_end(&mut buf)?;
        if buf.len() as u64 > limit {
            return Ok(None);
        }
        Ok(String::from_utf8(buf).ok())
    }
}

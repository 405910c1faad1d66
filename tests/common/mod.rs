// tests/common/mod.rs
//! Shared helpers for the CLI tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

/// Scratch directory removed on drop.
pub struct Workspace {
    dir: TempDir,
}

#[allow(dead_code)]
impl Workspace {
    pub fn new(prefix: &str) -> Self {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir().expect("create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, contents).expect("write file");
        path
    }
}

/// Account `octo` with one populated and one empty repository.
#[allow(dead_code)]
pub const ACCOUNT_FIXTURE: &str = r##"{
    "accounts": { "octo": [
        { "name": "alpha", "size": 10 },
        { "name": "empty", "size": 0 }
    ] },
    "repositories": {
        "octo/alpha": {
            "files": {
                "src/main.rs": "fn main() {\n    // entry\n}\n",
                "tool.py": "# helper\nprint(1)\n",
                "node_modules/dep.js": "module.exports = {};\n"
            }
        }
    }
}"##;

/// Three files; the third read hits an exhausted quota.
#[allow(dead_code)]
pub const QUOTA_FIXTURE: &str = r#"{
    "repositories": { "octo/demo": { "files": {
        "a.rs": "fn a() {}",
        "b.rs": "fn b() {}",
        "c.rs": "fn c() {}"
    } } },
    "quota": { "readsBeforeExhaustion": 2, "resetAt": "2030-01-01T00:00:00Z" }
}"#;

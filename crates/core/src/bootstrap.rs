// crates/core/src/bootstrap.rs
use std::{path::Path, sync::Arc};

use repo_lines_domain::EngineConfig;
use repo_lines_infra::{FixtureHost, LocalTree};
use repo_lines_shared_kernel::{ErrorContext, InfrastructureError, Result};

use crate::engine::StatsEngine;

/// Owner and name under which a local checkout is reported.
pub const LOCAL_OWNER: &str = "local";

/// Engine over a JSON fixture describing accounts and repositories.
pub fn fixture_engine(fixture: &Path, config: EngineConfig) -> Result<StatsEngine> {
    let host = Arc::new(FixtureHost::load(fixture)?);
    StatsEngine::builder(host.clone())
        .accounts(host.clone())
        .declared_languages(host)
        .config(config)
        .sweep_expired(true)
        .build()
}

/// Engine serving one local directory as the repository `local/<dir name>`.
///
/// Returns the engine and the repository name to query.
pub fn local_engine(root: &Path, config: EngineConfig) -> Result<(StatsEngine, String)> {
    if !root.is_dir() {
        return Err(InfrastructureError::Io { message: format!("{} is not a directory", root.display()), source: None })
            .context("opening local checkout");
    }
    let name = local_repo_name(root);
    let tree = Arc::new(LocalTree::new(root, config.max_file_size));
    let engine = StatsEngine::builder(tree).config(config).build()?;
    Ok((engine, name))
}

/// Directory name reduced to characters valid in a repository name.
fn local_repo_name(root: &Path) -> String {
    let raw = root
        .canonicalize()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_default();
    let cleaned: String =
        raw.chars().map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '-' }).collect();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." { "checkout".to_string() } else { cleaned }
}

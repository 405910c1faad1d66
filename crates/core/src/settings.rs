// crates/core/src/settings.rs
use std::{path::Path, time::Duration};

use repo_lines_domain::EngineConfig;
use repo_lines_infra::persistence::FileReader;
use repo_lines_shared_kernel::{DomainError, ErrorContext, Result};
use serde::Deserialize;

pub const ENV_CACHE_TTL: &str = "REPO_LINES_CACHE_TTL";
pub const ENV_JOBS: &str = "REPO_LINES_JOBS";
pub const ENV_MAX_REPOS: &str = "REPO_LINES_MAX_REPOS";
pub const ENV_MAX_FILE_SIZE: &str = "REPO_LINES_MAX_FILE_SIZE";
pub const ENV_DEADLINE_SECS: &str = "REPO_LINES_DEADLINE_SECS";

/// One configuration layer. Unset fields fall through to the layer below.
///
/// Layers are stacked with [`Settings::overlay`]: built-in defaults, then
/// the YAML file, then environment variables, then command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub jobs: Option<usize>,
    pub cache_ttl_secs: Option<u64>,
    pub max_repos: Option<usize>,
    pub page_size: Option<u32>,
    pub max_file_size: Option<u64>,
    pub deadline_secs: Option<u64>,
    pub accept_partial: Option<bool>,
}

impl Settings {
    /// Fields set in `upper` replace those in `self`.
    #[must_use]
    pub fn overlay(self, upper: Settings) -> Settings {
        Settings {
            jobs: upper.jobs.or(self.jobs),
            cache_ttl_secs: upper.cache_ttl_secs.or(self.cache_ttl_secs),
            max_repos: upper.max_repos.or(self.max_repos),
            page_size: upper.page_size.or(self.page_size),
            max_file_size: upper.max_file_size.or(self.max_file_size),
            deadline_secs: upper.deadline_secs.or(self.deadline_secs),
            accept_partial: upper.accept_partial.or(self.accept_partial),
        }
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    #[cfg(not(feature = "yaml"))]
    pub fn from_yaml(_yaml: &str) -> Result<Self> {
        Err(invalid("settings files need the `yaml` feature").into())
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let text = FileReader::read_to_string(path)?;
        Self::from_yaml(&text).with_context(|| format!("reading settings from {}", path.display()))
    }

    /// Environment layer read through `lookup`.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Settings {
            jobs: parse_var(&lookup, ENV_JOBS)?,
            cache_ttl_secs: parse_var(&lookup, ENV_CACHE_TTL)?,
            max_repos: parse_var(&lookup, ENV_MAX_REPOS)?,
            max_file_size: parse_var(&lookup, ENV_MAX_FILE_SIZE)?,
            deadline_secs: parse_var(&lookup, ENV_DEADLINE_SECS)?,
            ..Settings::default()
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Fill gaps with defaults and validate.
    pub fn resolve(&self) -> Result<EngineConfig> {
        let defaults = EngineConfig::default();
        if self.deadline_secs == Some(0) {
            return Err(invalid("deadline_secs must be positive").into());
        }
        let config = EngineConfig {
            jobs: self.jobs.unwrap_or_else(num_cpus::get),
            cache_ttl: self.cache_ttl_secs.map_or(defaults.cache_ttl, Duration::from_secs),
            max_repos: self.max_repos.unwrap_or(defaults.max_repos),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            max_file_size: self.max_file_size.unwrap_or(defaults.max_file_size),
            request_deadline: self.deadline_secs.map(Duration::from_secs),
            accept_partial: self.accept_partial.unwrap_or(defaults.accept_partial),
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| invalid(&format!("{name}={raw} is not a valid number")).into())
}

fn invalid(reason: &str) -> DomainError {
    DomainError::InvalidConfiguration { reason: reason.to_string() }
}

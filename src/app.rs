// src/app.rs
use std::io::Write;

use anyhow::{Context, Result, bail};
use repo_lines_core::{
    EngineConfig, Settings,
    bootstrap::{LOCAL_OWNER, fixture_engine, local_engine},
};

use crate::{
    args::{Args, Command},
    output,
};

/// Stack settings layers: file, environment, then command-line flags.
pub fn resolve_config(args: &Args) -> Result<EngineConfig> {
    let mut settings = Settings::default();
    if let Some(path) = &args.config {
        settings = settings.overlay(Settings::load_file(path)?);
    }
    settings = settings.overlay(Settings::from_env()?);
    settings = settings.overlay(Settings {
        jobs: args.jobs,
        deadline_secs: args.deadline_secs,
        accept_partial: args.partial.then_some(true),
        ..Settings::default()
    });
    Ok(settings.resolve()?)
}

pub fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let config = resolve_config(args)?;
    tracing::debug!(jobs = config.jobs, "configuration resolved");

    match &args.command {
        Command::Languages => {
            let labels = repo_lines_core::supported_languages();
            output::emit_languages(out, args.format, &labels)?;
        }
        Command::Account { account, fixture } => {
            let engine = fixture_engine(fixture, config)?;
            let served = engine
                .account_snapshot_with(account, &engine.request_options())
                .with_context(|| format!("account {account}"))?;
            output::emit_account(out, args.format, &served)?;
        }
        Command::Repo { target, fixture } => {
            let Some((owner, name)) = target.split_once('/') else {
                bail!("expected OWNER/REPO, got '{target}'");
            };
            let engine = fixture_engine(fixture, config)?;
            let served = engine
                .repo_stats_with(owner, name, &engine.request_options())
                .with_context(|| format!("repository {target}"))?;
            output::emit_repository(out, args.format, target, &served)?;
        }
        Command::Scan { dir } => {
            let (engine, name) = local_engine(dir, config)?;
            let served = engine
                .repo_stats_with(LOCAL_OWNER, &name, &engine.request_options())
                .with_context(|| format!("scanning {}", dir.display()))?;
            output::emit_repository(out, args.format, &format!("{LOCAL_OWNER}/{name}"), &served)?;
        }
    }
    Ok(())
}

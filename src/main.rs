// src/main.rs
#![allow(clippy::multiple_crate_versions)]

use anyhow::Result;
use clap::Parser;
use repo_lines::{app, args::Args};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "repo_lines=info".into()))
        .init();

    let args = Args::parse();
    let stdout = std::io::stdout();
    app::run(&args, &mut stdout.lock())
}

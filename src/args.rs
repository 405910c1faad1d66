// src/args.rs
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::VERSION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "repo_lines", version = VERSION, about = "Per-language line statistics for hosted repositories")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Worker threads (also the cap on concurrent remote calls)
    #[arg(long, global = true)]
    pub jobs: Option<usize>,

    /// YAML settings file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Give up issuing remote calls after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub deadline_secs: Option<u64>,

    /// Print partial results instead of failing on quota or deadline
    #[arg(long, global = true)]
    pub partial: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Statistics for every repository of an account
    Account {
        account: String,
        /// JSON fixture describing the host
        #[arg(long, value_name = "FILE")]
        fixture: PathBuf,
    },
    /// Statistics for one repository
    Repo {
        #[arg(value_name = "OWNER/REPO")]
        target: String,
        #[arg(long, value_name = "FILE")]
        fixture: PathBuf,
    },
    /// Statistics for a local checkout
    Scan { dir: PathBuf },
    /// List the languages that can be recognised
    Languages,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_follow_the_subcommand() {
        let args =
            Args::try_parse_from(["repo_lines", "scan", ".", "--format", "json", "--jobs", "2", "--partial"]).unwrap();
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.jobs, Some(2));
        assert!(args.partial);
        assert!(matches!(args.command, Command::Scan { .. }));
    }

    #[test]
    fn account_requires_a_fixture() {
        assert!(Args::try_parse_from(["repo_lines", "account", "octo"]).is_err());
    }
}

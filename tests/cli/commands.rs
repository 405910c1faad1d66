use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

use crate::common::{ACCOUNT_FIXTURE, QUOTA_FIXTURE, Workspace};

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_repo_lines"));
    for var in [
        "REPO_LINES_JOBS",
        "REPO_LINES_CACHE_TTL",
        "REPO_LINES_MAX_REPOS",
        "REPO_LINES_MAX_FILE_SIZE",
        "REPO_LINES_DEADLINE_SECS",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run binary");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn account_snapshot_as_json() {
    let ws = Workspace::new("account");
    let fixture = ws.write_file("host.json", ACCOUNT_FIXTURE);

    let value = json_stdout(bin().args(["account", "octo", "--format", "json", "--fixture"]).arg(&fixture));
    let data = &value["data"];
    assert_eq!(data["totalRepos"], 2);
    assert_eq!(data["processedRepos"], 1);
    assert_eq!(data["languages"]["Rust"]["lines"], 4);
    assert_eq!(data["languages"]["Rust"]["comments"], 1);
    assert!(data["languages"].get("JavaScript").is_none());
    assert_eq!(value["cached"], false);
    assert_eq!(value["completeness"]["status"], "complete");
}

#[test]
fn account_snapshot_as_table() {
    let ws = Workspace::new("table");
    let fixture = ws.write_file("host.json", ACCOUNT_FIXTURE);

    bin()
        .args(["account", "octo", "--fixture"])
        .arg(&fixture)
        .assert()
        .success()
        .stdout(predicate::str::contains("octo: 2 repositories (1 processed)").and(predicate::str::contains("TOTAL")));
}

#[test]
fn unknown_account_fails() {
    let ws = Workspace::new("missing");
    let fixture = ws.write_file("host.json", ACCOUNT_FIXTURE);

    bin()
        .args(["account", "nobody", "--fixture"])
        .arg(&fixture)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn repo_target_must_name_owner_and_repository() {
    let ws = Workspace::new("target");
    let fixture = ws.write_file("host.json", ACCOUNT_FIXTURE);

    bin()
        .args(["repo", "alpha", "--fixture"])
        .arg(&fixture)
        .assert()
        .failure()
        .stderr(predicate::str::contains("OWNER/REPO"));
}

#[test]
fn quota_exhaustion_fails_unless_partial_is_accepted() {
    let ws = Workspace::new("quota");
    let fixture = ws.write_file("host.json", QUOTA_FIXTURE);

    bin()
        .args(["repo", "octo/demo", "--jobs", "1", "--fixture"])
        .arg(&fixture)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rate limit exceeded"));

    let value = json_stdout(
        bin().args(["repo", "octo/demo", "--jobs", "1", "--partial", "--format", "json", "--fixture"]).arg(&fixture),
    );
    assert_eq!(value["completeness"]["status"], "partial");
    assert_eq!(value["completeness"]["interruption"]["cause"], "quotaExceeded");
    assert_eq!(value["data"]["languages"]["Rust"]["files"], 2);
}

#[test]
fn scan_counts_a_local_checkout() {
    let ws = Workspace::new("scan");
    ws.write_file("src/lib.rs", "pub fn a() {}\n\n// done\n");
    ws.write_file("target/debug/out.rs", "fn generated() {}\n");
    ws.write_file("notes.txt", "hello");

    let value = json_stdout(bin().args(["scan", "--format", "json"]).arg(ws.path()));
    let languages = &value["data"]["languages"];
    assert_eq!(languages["Rust"]["files"], 1);
    assert_eq!(languages["Rust"]["lines"], 4);
    assert_eq!(languages["Rust"]["blank"], 2);
    assert_eq!(languages["Text"]["files"], 1);
}

#[test]
fn settings_file_is_applied() {
    let ws = Workspace::new("settings");
    let fixture = ws.write_file("host.json", ACCOUNT_FIXTURE);
    let settings = ws.write_file("settings.yaml", "max_repos: 1\n");

    let value = json_stdout(
        bin().args(["account", "octo", "--format", "json", "--config"]).arg(&settings).arg("--fixture").arg(&fixture),
    );
    assert_eq!(value["data"]["totalRepos"], 1);
}

#[test]
fn invalid_settings_are_reported() {
    let ws = Workspace::new("badsettings");
    let settings = ws.write_file("settings.yaml", "jobs: 0\n");

    bin().args(["languages", "--config"]).arg(&settings).assert().failure().stderr(predicate::str::contains("jobs"));
}
